use std::sync::Once;
#[cfg(debug_assertions)]
use std::time::Instant;

#[cfg(debug_assertions)]
const MICROS_PER_MILLI: u128 = 1000;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter syntax (ex. "debug", "metal_pipeline=trace"). Falls back to `RUST_LOG`,
    /// then `info`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }
        builder.write_style(config.write_style);
        if builder.try_init().is_err() {
            log::warn!("A logger was already installed, keeping it");
        }
    });
}

/// Runs `f`, logging how long it took (debug builds only).
pub fn debug_time<T>(label: &'static str, f: impl FnOnce() -> T) -> T {
    #[cfg(debug_assertions)]
    {
        let now = Instant::now();
        let r = f();
        let elapsed_micro = now.elapsed().as_micros();
        let (elapsed_display, unit) = if elapsed_micro > MICROS_PER_MILLI {
            (elapsed_micro / MICROS_PER_MILLI, "ms")
        } else {
            (elapsed_micro, "μs")
        };
        log::debug!("[{label:<40}] {:>6} {}", elapsed_display, unit);
        r
    }
    #[cfg(not(debug_assertions))]
    {
        f()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_debug_time_returns_value() {
        assert_eq!(debug_time("answer", || 6 * 7), 42);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LoggingConfig {
            env_filter: Some("debug".to_owned()),
            ..Default::default()
        };
        init_logging(&config);
        init_logging(&LoggingConfig::default());
        log::debug!("still logging");
    }
}

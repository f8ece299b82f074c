use crate::{mesh::SphereDescriptor, LoggingConfig, PipelineError, PixelFormat};
use std::str::FromStr;

pub const DRAW_MODE_ENV: &str = "PIPELINE_DRAW_MODE";

/// What the renderer does when the view asks it to draw.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DrawMode {
    /// Encode and present a frame on every redraw.
    Continuous,
    /// Encode and present the first redraw only.
    Once,
    /// Log the redraw and encode nothing.
    Acknowledge,
}

impl FromStr for DrawMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(DrawMode::Continuous),
            "once" => Ok(DrawMode::Once),
            "acknowledge" => Ok(DrawMode::Acknowledge),
            other => Err(PipelineError::InvalidConfig(format!(
                "Unknown draw mode '{other}', expected one of: continuous, once, acknowledge"
            ))),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct RendererConfig {
    pub sphere: SphereDescriptor,
    pub clear_color: [f64; 4],
    pub color_pixel_format: PixelFormat,
    pub draw_mode: DrawMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            sphere: SphereDescriptor::default(),
            clear_color: [1.0, 0.8, 1.0, 1.0],
            color_pixel_format: PixelFormat::BGRA8Unorm,
            draw_mode: DrawMode::Continuous,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub window_size: [f64; 2],
    pub logging: LoggingConfig,
    pub renderer: RendererConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pipeline".to_owned(),
            window_size: [600.0, 600.0],
            logging: LoggingConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl AppConfig {
    /// Applies `PIPELINE_DRAW_MODE` if set.
    pub fn with_env_overrides(self) -> Result<Self, PipelineError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        if let Some(mode) = var(DRAW_MODE_ENV) {
            self.renderer.draw_mode = mode.parse()?;
        }
        Ok(self)
    }
}

use metal_pipeline::*;

#[cfg(target_os = "macos")]
fn run(config: AppConfig) -> Result<()> {
    let context = MetalContext::bootstrap()?;
    let renderer = Renderer::new(&context, &config.renderer)?;
    launch_application(&config, context, renderer)
}

#[cfg(not(target_os = "macos"))]
fn run(_config: AppConfig) -> Result<()> {
    Err(PipelineError::NoDevice)
}

fn main() {
    let config = AppConfig::default();
    init_logging(&config.logging);
    if let Err(error) = config.with_env_overrides().and_then(run) {
        log::error!("{error}");
        std::process::exit(1);
    }
}

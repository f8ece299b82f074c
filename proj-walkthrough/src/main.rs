use metal_pipeline::*;

#[cfg(target_os = "macos")]
fn run(config: AppConfig) -> Result<()> {
    use metal_pipeline::{
        mesh::{generate_sphere, upload_mesh},
        shader::{reflect_shader, SPHERE_SHADER},
    };

    log::info!("1. Device and command queue");
    let context = MetalContext::bootstrap()?;

    log::info!("2. Sphere mesh");
    let mesh_data = debug_time("Sphere generation", || generate_sphere(&config.renderer.sphere))?;
    log::info!(
        "   {} vertices, {} submesh(es), {} indices",
        mesh_data.vertices.len(),
        mesh_data.submeshes.len(),
        mesh_data.submeshes.iter().map(|s| s.indices.len()).sum::<usize>()
    );
    let mesh = upload_mesh(&context, &mesh_data)?;

    log::info!("3. Shader functions");
    let shader = reflect_shader(SPHERE_SHADER)?;
    for function in &shader.functions {
        log::info!("   {} function '{}'", function.stage, function.name);
    }

    log::info!("4. Pipeline state");
    let desc = PipelineDescriptor::new(mesh.layout.clone(), config.renderer.color_pixel_format);
    desc.validate(&shader)?;
    let pipeline = debug_time("Pipeline creation", || {
        context.new_render_pipeline(SPHERE_SHADER, &desc)
    })?;

    log::info!("5. Render one frame");
    let renderer = Renderer::<MetalContext>::from_parts(mesh, pipeline, config.renderer.draw_mode);
    launch_application(&config, context, renderer)
}

#[cfg(not(target_os = "macos"))]
fn run(_config: AppConfig) -> Result<()> {
    Err(PipelineError::NoDevice)
}

/// The walkthrough always renders a single frame on white, whatever the environment asks for.
fn walkthrough_config(mut config: AppConfig) -> AppConfig {
    config.renderer.clear_color = [1.0, 1.0, 1.0, 1.0];
    config.renderer.draw_mode = DrawMode::Once;
    config
}

fn main() {
    let config = AppConfig {
        title: "Walkthrough".to_owned(),
        ..AppConfig::default()
    };
    init_logging(&config.logging);
    if let Err(error) = config
        .with_env_overrides()
        .map(walkthrough_config)
        .and_then(run)
    {
        log::error!("{error}");
        std::process::exit(1);
    }
}

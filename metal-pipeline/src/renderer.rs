use crate::{
    build_pipeline, debug_time, encode_frame,
    mesh::{generate_sphere, upload_mesh, GpuMesh},
    shader::SPHERE_SHADER,
    DrawMode, FrameSource, GpuBackend, PipelineDescriptor, RendererConfig, Result, ViewDelegate,
};

/// Draws the sphere. Construction is the one-time setup phase (mesh + pipeline), `draw` is the
/// per-frame phase. A `Renderer` cannot exist without both, so every draw runs against fully
/// built resources.
pub struct Renderer<B: GpuBackend> {
    mesh: GpuMesh<B::Buffer>,
    pipeline: B::Pipeline,
    draw_mode: DrawMode,
    frames_presented: u64,
}

impl<B: GpuBackend> Renderer<B> {
    pub fn new(backend: &B, config: &RendererConfig) -> Result<Self> {
        let mesh_data = debug_time("Sphere generation", || generate_sphere(&config.sphere))?;
        let mesh = upload_mesh(backend, &mesh_data)?;
        let pipeline = build_pipeline(
            backend,
            SPHERE_SHADER,
            &PipelineDescriptor::new(mesh.layout.clone(), config.color_pixel_format),
        )?;
        Ok(Self::from_parts(mesh, pipeline, config.draw_mode))
    }

    #[inline]
    pub fn from_parts(mesh: GpuMesh<B::Buffer>, pipeline: B::Pipeline, draw_mode: DrawMode) -> Self {
        Self {
            mesh,
            pipeline,
            draw_mode,
            frames_presented: 0,
        }
    }

    #[inline]
    pub fn mesh(&self) -> &GpuMesh<B::Buffer> {
        &self.mesh
    }

    #[inline]
    pub fn pipeline(&self) -> &B::Pipeline {
        &self.pipeline
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    #[inline]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn draw<V: FrameSource<B> + ?Sized>(&mut self, backend: &B, view: &mut V) -> Result<()> {
        match self.draw_mode {
            DrawMode::Acknowledge => {
                log::info!("draw");
                return Ok(());
            }
            DrawMode::Once if self.frames_presented > 0 => return Ok(()),
            DrawMode::Once | DrawMode::Continuous => {}
        }
        encode_frame(backend, view, &self.pipeline, &self.mesh)?;
        self.frames_presented += 1;
        Ok(())
    }
}

impl<B: GpuBackend, V: FrameSource<B> + ?Sized> ViewDelegate<B, V> for Renderer<B> {
    #[inline]
    fn drawable_size_will_change(&mut self, _backend: &B, size: [f64; 2]) {
        // No resize policy: the pipeline and mesh do not depend on the drawable size, and a resize
        // does not re-arm `DrawMode::Once`. The single frame keeps its original drawable size.
        log::trace!("Drawable size will change to {}x{}", size[0], size[1]);
    }

    #[inline]
    fn draw_in(&mut self, backend: &B, view: &mut V) -> Result<()> {
        self.draw(backend, view)
    }

    #[inline]
    fn needs_display(&self) -> bool {
        !matches!(self.draw_mode, DrawMode::Once) || self.frames_presented == 0
    }
}

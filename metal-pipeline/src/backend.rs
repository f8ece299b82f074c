use crate::{mesh::MeshBufferAllocator, IndexType, PipelineDescriptor, PrimitiveType, Result};

pub struct IndexedDraw<'a, B> {
    pub primitive: PrimitiveType,
    pub index_count: u64,
    pub index_type: IndexType,
    pub index_buffer: &'a B,
    pub index_buffer_offset: u64,
}

/// The GPU operations the renderer needs: pipeline compilation, buffer allocation (through
/// `MeshBufferAllocator`) and recording/submitting one frame's commands.
pub trait GpuBackend: MeshBufferAllocator {
    type Pipeline;
    type PassDescriptor;
    type Drawable;
    type CommandBuffer;
    type Encoder;

    /// Compiles `source` and creates a pipeline state. `desc` has already been validated against
    /// the reflected shader interface.
    fn new_render_pipeline(&self, source: &str, desc: &PipelineDescriptor)
        -> Result<Self::Pipeline>;

    fn new_command_buffer(&self, label: &str) -> Self::CommandBuffer;
    fn new_render_encoder(
        &self,
        command_buffer: &Self::CommandBuffer,
        pass: &Self::PassDescriptor,
    ) -> Self::Encoder;
    fn set_render_pipeline_state(&self, encoder: &Self::Encoder, pipeline: &Self::Pipeline);
    fn set_vertex_buffer(&self, encoder: &Self::Encoder, slot: u64, buffer: &Self::Buffer, offset: u64);
    fn draw_indexed(&self, encoder: &Self::Encoder, draw: IndexedDraw<'_, Self::Buffer>);
    fn end_encoding(&self, encoder: &Self::Encoder);
    fn present_drawable(&self, command_buffer: &Self::CommandBuffer, drawable: &Self::Drawable);
    fn commit(&self, command_buffer: &Self::CommandBuffer);
}

/// A presentable surface: hands out the render target of the frame being drawn.
pub trait FrameSource<B: GpuBackend + ?Sized> {
    fn current_render_pass_descriptor(&mut self) -> Option<B::PassDescriptor>;
    fn current_drawable(&mut self) -> Option<B::Drawable>;

    /// Runs one redraw. Views whose per-frame objects are autoreleased wrap `redraw` in a pool so
    /// they are released when the frame ends rather than when the run loop drains.
    #[inline]
    fn frame_scope(&mut self, redraw: &mut dyn FnMut(&mut Self) -> Result<()>) -> Result<()> {
        redraw(self)
    }

    /// Called once the delegate is done with a frame; the next frame gets a fresh drawable.
    #[inline]
    fn frame_finished(&mut self) {}

    #[inline]
    fn set_drawable_size(&mut self, _size: [f64; 2]) {}
}

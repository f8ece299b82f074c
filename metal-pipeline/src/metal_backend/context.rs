use crate::{
    bootstrap::claim_process_context, mesh::MeshBufferAllocator, GpuBackend, IndexedDraw,
    PipelineDescriptor, PipelineError, Result, VertexLayout,
};
use metal::*;
use std::ffi::c_void;

pub const DEFAULT_RESOURCE_OPTIONS: MTLResourceOptions = MTLResourceOptions::from_bits_truncate(
    MTLResourceOptions::StorageModeShared.bits()
        | MTLResourceOptions::CPUCacheModeWriteCombined.bits(),
);

/// The process' Metal device and command queue. Created once by `bootstrap()` and handed to
/// whatever needs GPU access.
pub struct MetalContext {
    device: Device,
    command_queue: CommandQueue,
}

impl MetalContext {
    pub fn bootstrap() -> Result<Self> {
        let device = Device::system_default().ok_or(PipelineError::NoDevice)?;
        claim_process_context()?;
        let command_queue = device.new_command_queue();
        command_queue.set_label("Command Queue");
        log::info!("Using Metal device: {}", device.name());
        Ok(Self {
            device,
            command_queue,
        })
    }

    #[inline]
    pub fn device(&self) -> &DeviceRef {
        &self.device
    }

    #[inline]
    pub fn command_queue(&self) -> &CommandQueueRef {
        &self.command_queue
    }
}

impl MeshBufferAllocator for DeviceRef {
    type Buffer = Buffer;

    fn new_buffer_with_data(&self, label: &str, bytes: &[u8]) -> Result<Buffer> {
        if bytes.is_empty() || bytes.len() as u64 > self.max_buffer_length() {
            return Err(PipelineError::BufferAllocation {
                label: label.to_owned(),
                bytes: bytes.len(),
            });
        }
        let buf = self.new_buffer_with_data(
            bytes.as_ptr() as *const c_void,
            bytes.len() as _,
            DEFAULT_RESOURCE_OPTIONS,
        );
        buf.set_label(label);
        Ok(buf)
    }
}

impl MeshBufferAllocator for MetalContext {
    type Buffer = Buffer;

    #[inline]
    fn new_buffer_with_data(&self, label: &str, bytes: &[u8]) -> Result<Buffer> {
        <DeviceRef as MeshBufferAllocator>::new_buffer_with_data(&self.device, label, bytes)
    }
}

fn new_vertex_descriptor(layout: &VertexLayout) -> Result<&'static VertexDescriptorRef> {
    let desc = VertexDescriptor::new();
    for a in &layout.attributes {
        let attribute = desc.attributes().object_at(a.index as _).ok_or_else(|| {
            PipelineError::PipelineCreation(format!(
                "Failed to access vertex attribute {} on vertex descriptor",
                a.index
            ))
        })?;
        attribute.set_format(a.format.into());
        attribute.set_offset(a.offset as _);
        attribute.set_buffer_index(a.buffer_index as _);
    }
    for (index, b) in layout.buffers.iter().enumerate() {
        let buffer_layout = desc.layouts().object_at(index as _).ok_or_else(|| {
            PipelineError::PipelineCreation(format!(
                "Failed to access buffer layout {index} on vertex descriptor"
            ))
        })?;
        buffer_layout.set_stride(b.stride as _);
        buffer_layout.set_step_function(b.step_function.into());
        buffer_layout.set_step_rate(1);
    }
    Ok(desc)
}

impl GpuBackend for MetalContext {
    type Pipeline = RenderPipelineState;
    type PassDescriptor = RenderPassDescriptor;
    type Drawable = MetalDrawable;
    type CommandBuffer = CommandBuffer;
    type Encoder = RenderCommandEncoder;

    fn new_render_pipeline(
        &self,
        source: &str,
        desc: &PipelineDescriptor,
    ) -> Result<RenderPipelineState> {
        let library = self
            .device
            .new_library_with_source(source, &CompileOptions::new())
            .map_err(PipelineError::ShaderCompile)?;
        let function = |name: &String| {
            library
                .get_function(name, None)
                .map_err(|_| PipelineError::MissingFunction { name: name.clone() })
        };
        let vertex_function = function(&desc.vertex_function)?;
        let fragment_function = function(&desc.fragment_function)?;

        let pipeline_state_desc = RenderPipelineDescriptor::new();
        pipeline_state_desc.set_label(&desc.label);
        pipeline_state_desc.set_vertex_function(Some(&vertex_function));
        pipeline_state_desc.set_fragment_function(Some(&fragment_function));
        pipeline_state_desc
            .color_attachments()
            .object_at(0)
            .ok_or_else(|| {
                PipelineError::PipelineCreation(
                    "Failed to access color attachment on pipeline descriptor".to_owned(),
                )
            })?
            .set_pixel_format(desc.color_pixel_format.into());
        pipeline_state_desc
            .set_vertex_descriptor(Some(new_vertex_descriptor(&desc.vertex_layout)?));

        self.device
            .new_render_pipeline_state(&pipeline_state_desc)
            .map_err(PipelineError::PipelineCreation)
    }

    #[inline]
    fn new_command_buffer(&self, label: &str) -> CommandBuffer {
        let command_buffer = self.command_queue.new_command_buffer();
        command_buffer.set_label(label);
        command_buffer.to_owned()
    }

    #[inline]
    fn new_render_encoder(
        &self,
        command_buffer: &CommandBuffer,
        pass: &RenderPassDescriptor,
    ) -> RenderCommandEncoder {
        command_buffer.new_render_command_encoder(pass).to_owned()
    }

    #[inline]
    fn set_render_pipeline_state(
        &self,
        encoder: &RenderCommandEncoder,
        pipeline: &RenderPipelineState,
    ) {
        encoder.set_render_pipeline_state(pipeline);
    }

    #[inline]
    fn set_vertex_buffer(
        &self,
        encoder: &RenderCommandEncoder,
        slot: u64,
        buffer: &Buffer,
        offset: u64,
    ) {
        encoder.set_vertex_buffer(slot, Some(buffer), offset);
    }

    #[inline]
    fn draw_indexed(&self, encoder: &RenderCommandEncoder, draw: IndexedDraw<'_, Buffer>) {
        encoder.draw_indexed_primitives(
            draw.primitive.into(),
            draw.index_count,
            draw.index_type.into(),
            draw.index_buffer,
            draw.index_buffer_offset,
        );
    }

    #[inline]
    fn end_encoding(&self, encoder: &RenderCommandEncoder) {
        encoder.end_encoding();
    }

    #[inline]
    fn present_drawable(&self, command_buffer: &CommandBuffer, drawable: &MetalDrawable) {
        command_buffer.present_drawable(drawable);
    }

    #[inline]
    fn commit(&self, command_buffer: &CommandBuffer) {
        command_buffer.commit();
    }
}

//! In-memory stand-ins for the GPU and the view, recording what the renderer asks of them.

use crate::{
    mesh::MeshBufferAllocator, FrameSource, GpuBackend, IndexType, IndexedDraw, PipelineDescriptor,
    PipelineError, PrimitiveType, Result,
};
use std::cell::{Cell, RefCell};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VecBuffer {
    pub label: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct VecAllocator {
    byte_limit: Option<usize>,
    allocations: Cell<usize>,
}

impl VecAllocator {
    pub fn with_byte_limit(byte_limit: usize) -> Self {
        Self {
            byte_limit: Some(byte_limit),
            ..Default::default()
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }
}

impl MeshBufferAllocator for VecAllocator {
    type Buffer = VecBuffer;

    fn new_buffer_with_data(&self, label: &str, bytes: &[u8]) -> Result<VecBuffer> {
        if self.byte_limit.map_or(false, |limit| bytes.len() > limit) {
            return Err(PipelineError::BufferAllocation {
                label: label.to_owned(),
                bytes: bytes.len(),
            });
        }
        self.allocations.set(self.allocations.get() + 1);
        Ok(VecBuffer {
            label: label.to_owned(),
            bytes: bytes.to_vec(),
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Call {
    NewRenderPipeline {
        label: String,
        vertex_function: String,
        fragment_function: String,
    },
    NewCommandBuffer(String),
    NewRenderEncoder {
        pass: usize,
    },
    SetRenderPipelineState(String),
    SetVertexBuffer {
        slot: u64,
        buffer: String,
        offset: u64,
    },
    DrawIndexed {
        primitive: PrimitiveType,
        index_count: u64,
        index_type: IndexType,
        index_buffer: String,
        index_buffer_offset: u64,
    },
    EndEncoding,
    PresentDrawable(usize),
    Commit,
}

#[derive(Default)]
pub struct RecordingBackend {
    pub allocator: VecAllocator,
    pub compile_error: Option<String>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingBackend {
    pub fn with_compile_error(message: &str) -> Self {
        Self {
            compile_error: Some(message.to_owned()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn draw_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::DrawIndexed { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl MeshBufferAllocator for RecordingBackend {
    type Buffer = VecBuffer;

    fn new_buffer_with_data(&self, label: &str, bytes: &[u8]) -> Result<VecBuffer> {
        self.allocator.new_buffer_with_data(label, bytes)
    }
}

impl GpuBackend for RecordingBackend {
    type Pipeline = String;
    type PassDescriptor = usize;
    type Drawable = usize;
    type CommandBuffer = ();
    type Encoder = ();

    fn new_render_pipeline(&self, _source: &str, desc: &PipelineDescriptor) -> Result<String> {
        if let Some(e) = &self.compile_error {
            return Err(PipelineError::ShaderCompile(e.clone()));
        }
        self.record(Call::NewRenderPipeline {
            label: desc.label.clone(),
            vertex_function: desc.vertex_function.clone(),
            fragment_function: desc.fragment_function.clone(),
        });
        Ok(desc.label.clone())
    }

    fn new_command_buffer(&self, label: &str) {
        self.record(Call::NewCommandBuffer(label.to_owned()));
    }

    fn new_render_encoder(&self, _command_buffer: &(), pass: &usize) {
        self.record(Call::NewRenderEncoder { pass: *pass });
    }

    fn set_render_pipeline_state(&self, _encoder: &(), pipeline: &String) {
        self.record(Call::SetRenderPipelineState(pipeline.clone()));
    }

    fn set_vertex_buffer(&self, _encoder: &(), slot: u64, buffer: &VecBuffer, offset: u64) {
        self.record(Call::SetVertexBuffer {
            slot,
            buffer: buffer.label.clone(),
            offset,
        });
    }

    fn draw_indexed(&self, _encoder: &(), draw: IndexedDraw<'_, VecBuffer>) {
        self.record(Call::DrawIndexed {
            primitive: draw.primitive,
            index_count: draw.index_count,
            index_type: draw.index_type,
            index_buffer: draw.index_buffer.label.clone(),
            index_buffer_offset: draw.index_buffer_offset,
        });
    }

    fn end_encoding(&self, _encoder: &()) {
        self.record(Call::EndEncoding);
    }

    fn present_drawable(&self, _command_buffer: &(), drawable: &usize) {
        self.record(Call::PresentDrawable(*drawable));
    }

    fn commit(&self, _command_buffer: &()) {
        self.record(Call::Commit);
    }
}

pub struct TestView {
    pub has_render_pass: bool,
    pub has_drawable: bool,
    pub frames_finished: usize,
    pub drawable_sizes: Vec<[f64; 2]>,
    pub frame_scopes: usize,
    /// Render pass, drawable and frame-finished requests made outside `frame_scope`.
    pub unscoped_requests: usize,
    pub in_frame_scope: bool,
}

impl TestView {
    fn note_request(&mut self) {
        if !self.in_frame_scope {
            self.unscoped_requests += 1;
        }
    }
}

impl Default for TestView {
    fn default() -> Self {
        Self {
            has_render_pass: true,
            has_drawable: true,
            frames_finished: 0,
            drawable_sizes: vec![],
            frame_scopes: 0,
            unscoped_requests: 0,
            in_frame_scope: false,
        }
    }
}

impl FrameSource<RecordingBackend> for TestView {
    fn current_render_pass_descriptor(&mut self) -> Option<usize> {
        self.note_request();
        self.has_render_pass.then_some(self.frames_finished)
    }

    fn current_drawable(&mut self) -> Option<usize> {
        self.note_request();
        self.has_drawable.then_some(self.frames_finished)
    }

    fn frame_scope(&mut self, redraw: &mut dyn FnMut(&mut Self) -> Result<()>) -> Result<()> {
        self.frame_scopes += 1;
        self.in_frame_scope = true;
        let result = redraw(self);
        self.in_frame_scope = false;
        result
    }

    fn frame_finished(&mut self) {
        self.note_request();
        self.frames_finished += 1;
    }

    fn set_drawable_size(&mut self, size: [f64; 2]) {
        self.drawable_sizes.push(size);
    }
}

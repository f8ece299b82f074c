use crate::{mesh::GpuMesh, FrameSource, GpuBackend, IndexedDraw, PipelineError, Result};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FrameState {
    Idle,
    Encoding,
    Submitted,
    Presented,
}

/// One frame's worth of GPU work. Created per redraw and never reused.
pub struct Frame<'a, B: GpuBackend> {
    backend: &'a B,
    state: FrameState,
    command_buffer: Option<B::CommandBuffer>,
    encoder: Option<B::Encoder>,
}

impl<'a, B: GpuBackend> Frame<'a, B> {
    #[inline]
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            state: FrameState::Idle,
            command_buffer: None,
            encoder: None,
        }
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    fn expect_state(&self, expected: FrameState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PipelineError::FrameOutOfOrder {
                expected,
                found: self.state,
            })
        }
    }

    #[inline]
    fn transition(&mut self, to: FrameState) {
        log::trace!("Frame {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    /// Idle -> Encoding
    pub fn begin<V: FrameSource<B> + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.expect_state(FrameState::Idle)?;
        let pass = view
            .current_render_pass_descriptor()
            .ok_or(PipelineError::NoRenderPassDescriptor)?;
        let command_buffer = self.backend.new_command_buffer("Renderer Command Buffer");
        self.encoder = Some(self.backend.new_render_encoder(&command_buffer, &pass));
        self.command_buffer = Some(command_buffer);
        self.transition(FrameState::Encoding);
        Ok(())
    }

    /// Encoding -> Submitted
    pub fn encode_mesh(&mut self, pipeline: &B::Pipeline, mesh: &GpuMesh<B::Buffer>) -> Result<()> {
        self.expect_state(FrameState::Encoding)?;
        let submesh = mesh.first_submesh()?;
        let vertex_buffer = mesh
            .vertex_buffers
            .first()
            .ok_or(PipelineError::NoVertexBuffer)?;
        // Encoding always holds an encoder.
        let Some(encoder) = self.encoder.as_ref() else {
            return Err(PipelineError::FrameOutOfOrder {
                expected: FrameState::Encoding,
                found: self.state,
            });
        };
        self.backend.set_render_pipeline_state(encoder, pipeline);
        self.backend.set_vertex_buffer(encoder, 0, vertex_buffer, 0);
        self.backend.draw_indexed(
            encoder,
            IndexedDraw {
                primitive: submesh.primitive,
                index_count: submesh.index_count,
                index_type: submesh.index_type,
                index_buffer: &submesh.index_buffer,
                index_buffer_offset: 0,
            },
        );
        self.backend.end_encoding(encoder);
        self.encoder = None;
        self.transition(FrameState::Submitted);
        Ok(())
    }

    /// Submitted -> Presented
    pub fn present<V: FrameSource<B> + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.expect_state(FrameState::Submitted)?;
        let drawable = view.current_drawable().ok_or(PipelineError::NoDrawable)?;
        // Submitted always holds a command buffer.
        let Some(command_buffer) = self.command_buffer.take() else {
            return Err(PipelineError::FrameOutOfOrder {
                expected: FrameState::Submitted,
                found: self.state,
            });
        };
        self.backend.present_drawable(&command_buffer, &drawable);
        self.backend.commit(&command_buffer);
        self.transition(FrameState::Presented);
        Ok(())
    }
}

impl<'a, B: GpuBackend> Drop for Frame<'a, B> {
    fn drop(&mut self) {
        // Metal requires every encoder to be ended, even when the frame is abandoned.
        if let Some(encoder) = self.encoder.take() {
            self.backend.end_encoding(&encoder);
        }
    }
}

/// Runs a whole frame: acquire the render target, draw `mesh`'s first submesh once with
/// `pipeline`, present and commit. On failure the frame is abandoned where it stopped.
pub fn encode_frame<B: GpuBackend, V: FrameSource<B> + ?Sized>(
    backend: &B,
    view: &mut V,
    pipeline: &B::Pipeline,
    mesh: &GpuMesh<B::Buffer>,
) -> Result<FrameState> {
    let mut frame = Frame::new(backend);
    frame.begin(view)?;
    frame.encode_mesh(pipeline, mesh)?;
    frame.present(view)?;
    Ok(frame.state())
}

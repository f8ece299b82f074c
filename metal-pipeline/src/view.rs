use crate::{FrameSource, GpuBackend, Result};

/// Receives a view's redraw and size-change notifications.
pub trait ViewDelegate<B: GpuBackend, V: FrameSource<B> + ?Sized> {
    fn drawable_size_will_change(&mut self, backend: &B, size: [f64; 2]);

    fn draw_in(&mut self, backend: &B, view: &mut V) -> Result<()>;

    #[inline]
    fn needs_display(&self) -> bool {
        true
    }
}

/// Wires a view to its delegate. The view is expected to already be associated with the
/// backend's device.
pub struct ViewController<B: GpuBackend, V: FrameSource<B>, D: ViewDelegate<B, V>> {
    backend: B,
    view: V,
    delegate: D,
}

impl<B: GpuBackend, V: FrameSource<B>, D: ViewDelegate<B, V>> ViewController<B, V, D> {
    #[inline]
    pub fn new(backend: B, view: V, delegate: D) -> Self {
        Self {
            backend,
            view,
            delegate,
        }
    }

    /// Lets the delegate draw one frame, then releases the view's per-frame resources regardless
    /// of the outcome.
    pub fn redraw(&mut self) -> Result<()> {
        if !self.delegate.needs_display() {
            return Ok(());
        }
        let Self {
            backend,
            view,
            delegate,
        } = self;
        view.frame_scope(&mut |view| {
            let result = delegate.draw_in(backend, view);
            view.frame_finished();
            result
        })
    }

    pub fn resize(&mut self, size: [f64; 2]) {
        self.view.set_drawable_size(size);
        self.delegate
            .drawable_size_will_change(&self.backend, size);
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[inline]
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[inline]
    pub fn delegate(&self) -> &D {
        &self.delegate
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        testing::{RecordingBackend, TestView},
        DrawMode, PipelineError, Renderer, RendererConfig,
    };

    fn controller(
        draw_mode: DrawMode,
        view: TestView,
    ) -> ViewController<RecordingBackend, TestView, Renderer<RecordingBackend>> {
        let backend = RecordingBackend::default();
        let renderer = Renderer::new(
            &backend,
            &RendererConfig {
                draw_mode,
                ..Default::default()
            },
        )
        .unwrap();
        ViewController::new(backend, view, renderer)
    }

    #[test]
    fn test_redraw() {
        let mut c = controller(DrawMode::Continuous, TestView::default());
        c.redraw().unwrap();
        c.redraw().unwrap();
        assert_eq!(c.backend().draw_calls(), 2);
        assert_eq!(c.view().frames_finished, 2);
        assert_eq!(c.delegate().frames_presented(), 2);
    }

    #[test]
    fn test_redraw_failure_still_finishes_frame() {
        let mut c = controller(
            DrawMode::Continuous,
            TestView {
                has_render_pass: false,
                ..Default::default()
            },
        );
        assert_eq!(c.redraw(), Err(PipelineError::NoRenderPassDescriptor));
        assert_eq!(c.view().frames_finished, 1);

        c.view_mut().has_render_pass = true;
        c.redraw().unwrap();
        assert_eq!(c.backend().draw_calls(), 1);
    }

    #[test]
    fn test_once_skips_later_redraws() {
        let mut c = controller(DrawMode::Once, TestView::default());
        for _ in 0..4 {
            c.redraw().unwrap();
        }
        assert_eq!(c.backend().draw_calls(), 1);
        assert_eq!(c.view().frames_finished, 1);
    }

    #[test]
    fn test_acknowledge_logs_only() {
        let mut c = controller(DrawMode::Acknowledge, TestView::default());
        c.redraw().unwrap();
        assert_eq!(c.backend().draw_calls(), 0);
        assert_eq!(c.delegate().frames_presented(), 0);
    }

    #[test]
    fn test_redraw_runs_inside_frame_scope() {
        let mut c = controller(DrawMode::Continuous, TestView::default());
        c.redraw().unwrap();
        c.redraw().unwrap();
        assert_eq!(c.view().frame_scopes, 2);
        assert_eq!(c.view().frames_finished, 2);
        assert_eq!(c.view().unscoped_requests, 0);

        c.view_mut().has_drawable = false;
        assert_eq!(c.redraw(), Err(PipelineError::NoDrawable));
        assert_eq!(c.view().frame_scopes, 3);
        assert_eq!(c.view().unscoped_requests, 0);
        assert!(!c.view().in_frame_scope);
    }

    #[test]
    fn test_resize() {
        let mut c = controller(DrawMode::Continuous, TestView::default());
        let calls = c.backend().calls();
        c.resize([800.0, 600.0]);
        assert_eq!(c.view().drawable_sizes, vec![[800.0, 600.0]]);
        assert_eq!(c.backend().calls(), calls);
        assert_eq!(c.delegate().frames_presented(), 0);
    }
}

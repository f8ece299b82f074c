use super::MetalContext;
use crate::{FrameSource, RendererConfig, Result};
use core_graphics_types::geometry::CGSize;
use metal::*;
use objc::rc::autoreleasepool;

/// Layer-backed render target: owns the `CAMetalLayer`, hands out one drawable per frame and a
/// render pass descriptor that clears it to `clear_color`.
pub struct MetalView {
    layer: MetalLayer,
    clear_color: MTLClearColor,
    backing_scale_factor: f64,
    drawable_size: [f64; 2],
    current_drawable: Option<MetalDrawable>,
}

impl MetalView {
    pub fn new(context: &MetalContext, config: &RendererConfig, backing_scale_factor: f64) -> Self {
        let layer = MetalLayer::new();
        layer.set_device(context.device());
        layer.set_pixel_format(config.color_pixel_format.into());
        layer.set_framebuffer_only(true);
        layer.set_presents_with_transaction(false);
        let [r, g, b, a] = config.clear_color;
        Self {
            layer,
            clear_color: MTLClearColor::new(r, g, b, a),
            backing_scale_factor,
            drawable_size: [0.0, 0.0],
            current_drawable: None,
        }
    }

    #[inline]
    pub fn layer(&self) -> &MetalLayerRef {
        &self.layer
    }

    #[inline]
    pub fn set_clear_color(&mut self, [r, g, b, a]: [f64; 4]) {
        self.clear_color = MTLClearColor::new(r, g, b, a);
    }

    fn drawable(&mut self) -> Option<&MetalDrawable> {
        if self.current_drawable.is_none() {
            self.current_drawable = self.layer.next_drawable().map(ToOwned::to_owned);
        }
        self.current_drawable.as_ref()
    }
}

impl FrameSource<MetalContext> for MetalView {
    fn current_render_pass_descriptor(&mut self) -> Option<RenderPassDescriptor> {
        let clear_color = self.clear_color;
        let drawable = self.drawable()?;
        let desc = RenderPassDescriptor::new();
        let attachment = desc.color_attachments().object_at(0)?;
        attachment.set_texture(Some(drawable.texture()));
        attachment.set_load_action(MTLLoadAction::Clear);
        attachment.set_clear_color(clear_color);
        attachment.set_store_action(MTLStoreAction::Store);
        Some(desc.to_owned())
    }

    #[inline]
    fn current_drawable(&mut self) -> Option<MetalDrawable> {
        self.drawable().cloned()
    }

    #[inline]
    fn frame_scope(&mut self, redraw: &mut dyn FnMut(&mut Self) -> Result<()>) -> Result<()> {
        autoreleasepool(|| redraw(self))
    }

    #[inline]
    fn frame_finished(&mut self) {
        self.current_drawable = None;
    }

    fn set_drawable_size(&mut self, [width, height]: [f64; 2]) {
        let size = [
            width * self.backing_scale_factor,
            height * self.backing_scale_factor,
        ];
        if self.drawable_size != size {
            self.layer.set_drawable_size(CGSize::new(size[0], size[1]));
            self.drawable_size = size;
        }
    }
}

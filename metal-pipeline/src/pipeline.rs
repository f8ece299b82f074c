use crate::{
    debug_time,
    shader::{reflect_shader, ShaderInterface, ShaderStage, FRAGMENT_MAIN, VERTEX_MAIN},
    GpuBackend, PipelineError, PixelFormat, Result, VertexLayout,
};

#[derive(Clone, PartialEq, Debug)]
pub struct PipelineDescriptor {
    pub label: String,
    pub color_pixel_format: PixelFormat,
    pub vertex_function: String,
    pub fragment_function: String,
    pub vertex_layout: VertexLayout,
}

impl PipelineDescriptor {
    pub fn new(vertex_layout: VertexLayout, color_pixel_format: PixelFormat) -> Self {
        Self {
            label: "Render Pipeline".to_owned(),
            color_pixel_format,
            vertex_function: VERTEX_MAIN.to_owned(),
            fragment_function: FRAGMENT_MAIN.to_owned(),
            vertex_layout,
        }
    }

    /// Checks the descriptor against the shader before handing it to the (expensive) pipeline
    /// compiler: both functions exist with the right stage, and every `[[attribute(n)]]` the
    /// vertex function reads is provided by the vertex layout with a compatible scalar type.
    pub fn validate(&self, shader: &ShaderInterface) -> Result<()> {
        for (name, expected) in [
            (&self.vertex_function, ShaderStage::Vertex),
            (&self.fragment_function, ShaderStage::Fragment),
        ] {
            let f = shader
                .function(name)
                .ok_or_else(|| PipelineError::MissingFunction { name: name.clone() })?;
            if f.stage != expected {
                return Err(PipelineError::WrongStage {
                    name: name.clone(),
                    expected,
                    found: f.stage,
                });
            }
        }

        let mismatch = |reason: String| PipelineError::VertexLayoutMismatch {
            function: self.vertex_function.clone(),
            reason,
        };
        self.vertex_layout.check().map_err(mismatch)?;

        let vertex_fn = shader
            .function(&self.vertex_function)
            .ok_or_else(|| PipelineError::MissingFunction {
                name: self.vertex_function.clone(),
            })?;
        for input in &vertex_fn.stage_in {
            let Some(attribute) = self.vertex_layout.attribute(input.attribute) else {
                return Err(mismatch(format!(
                    "attribute({}) '{}' is not defined in the vertex layout",
                    input.attribute, input.name
                )));
            };
            // Component counts may differ, missing components are filled in as (0, 0, 0, 1).
            if attribute.format.scalar_kind() != input.data_type.kind {
                return Err(mismatch(format!(
                    "attribute({}) '{}' is {} ({}) but the layout provides {} ({:?})",
                    input.attribute,
                    input.name,
                    input.data_type.kind,
                    input.data_type.name,
                    attribute.format.scalar_kind(),
                    attribute.format
                )));
            }
        }
        Ok(())
    }
}

/// Builds the render pipeline for `source`. Expensive: build once per shader/layout combination
/// and reuse the result for every frame.
pub fn build_pipeline<B: GpuBackend + ?Sized>(
    backend: &B,
    source: &str,
    desc: &PipelineDescriptor,
) -> Result<B::Pipeline> {
    let shader = reflect_shader(source)?;
    desc.validate(&shader)?;
    debug_time("Render pipeline creation", || {
        backend.new_render_pipeline(source, desc)
    })
}

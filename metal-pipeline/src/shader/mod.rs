mod reflect;

pub use reflect::reflect_shader;
use std::fmt::Display;

/// Compiled at runtime from source: positions the sphere's vertices as-is and shades every
/// fragment opaque red.
pub const SPHERE_SHADER: &str = include_str!("../../shaders/sphere.metal");
pub const VERTEX_MAIN: &str = "vertex_main";
pub const FRAGMENT_MAIN: &str = "fragment_main";

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Kernel,
}

impl ShaderStage {
    pub const fn lowercase(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Kernel => "kernel",
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.lowercase(), f)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ScalarKind {
    Float,
    Int,
    UInt,
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(
            match self {
                ScalarKind::Float => "floating point",
                ScalarKind::Int => "signed integer",
                ScalarKind::UInt => "unsigned integer",
            },
            f,
        )
    }
}

/// Metal Shading Language scalar/vector type of a vertex input (ex. `float4`, `packed_half2`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ShaderDataType {
    pub name: String,
    pub kind: ScalarKind,
    pub components: u8,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VertexInput {
    pub attribute: u32,
    pub name: String,
    pub data_type: ShaderDataType,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ShaderFunction {
    pub name: String,
    pub stage: ShaderStage,
    pub stage_in: Vec<VertexInput>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ShaderInterface {
    pub functions: Vec<ShaderFunction>,
}

impl ShaderInterface {
    #[inline]
    pub fn function(&self, name: &str) -> Option<&ShaderFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

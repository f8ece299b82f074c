use crate::shader::ScalarKind;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VertexFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Half2,
    Half4,
    Int,
    Int2,
    Int4,
    UInt,
    UInt2,
    UInt4,
}

impl VertexFormat {
    pub const fn components(&self) -> u8 {
        use VertexFormat::*;
        match self {
            Float | Int | UInt => 1,
            Float2 | Half2 | Int2 | UInt2 => 2,
            Float3 => 3,
            Float4 | Half4 | Int4 | UInt4 => 4,
        }
    }

    pub const fn scalar_kind(&self) -> ScalarKind {
        use VertexFormat::*;
        match self {
            Float | Float2 | Float3 | Float4 | Half2 | Half4 => ScalarKind::Float,
            Int | Int2 | Int4 => ScalarKind::Int,
            UInt | UInt2 | UInt4 => ScalarKind::UInt,
        }
    }

    pub const fn byte_size(&self) -> usize {
        use VertexFormat::*;
        match self {
            Half2 => 4,
            Half4 => 8,
            _ => 4 * self.components() as usize,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VertexStepFunction {
    PerVertex,
    PerInstance,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub index: u32,
    pub format: VertexFormat,
    pub offset: usize,
    pub buffer_index: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct VertexBufferLayout {
    pub stride: usize,
    pub step_function: VertexStepFunction,
}

/// Describes how vertex buffers are laid out in memory and which attribute index each member
/// feeds. Handed to pipeline creation unchanged.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct VertexLayout {
    pub attributes: Vec<VertexAttribute>,
    pub buffers: Vec<VertexBufferLayout>,
}

impl VertexLayout {
    #[inline]
    pub fn attribute(&self, index: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.index == index)
    }

    /// Checks the layout is self-consistent: unique attribute indices, every attribute points at
    /// a declared buffer and fits within that buffer's stride.
    pub fn check(&self) -> Result<(), String> {
        for (i, a) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|b| b.index == a.index) {
                return Err(format!("attribute({}) is declared more than once", a.index));
            }
            let Some(buffer) = self.buffers.get(a.buffer_index as usize) else {
                return Err(format!(
                    "attribute({}) '{}' reads from undeclared buffer {}",
                    a.index, a.name, a.buffer_index
                ));
            };
            if a.offset + a.format.byte_size() > buffer.stride {
                return Err(format!(
                    "attribute({}) '{}' ends at byte {} past the buffer stride ({})",
                    a.index,
                    a.name,
                    a.offset + a.format.byte_size(),
                    buffer.stride
                ));
            }
        }
        Ok(())
    }
}

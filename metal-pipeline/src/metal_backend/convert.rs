use crate::{IndexType, PixelFormat, PrimitiveType, VertexFormat, VertexStepFunction};
use metal::{MTLIndexType, MTLPixelFormat, MTLPrimitiveType, MTLVertexFormat, MTLVertexStepFunction};

impl From<PixelFormat> for MTLPixelFormat {
    #[inline]
    fn from(f: PixelFormat) -> Self {
        match f {
            PixelFormat::BGRA8Unorm => MTLPixelFormat::BGRA8Unorm,
            PixelFormat::BGRA8Unorm_sRGB => MTLPixelFormat::BGRA8Unorm_sRGB,
            PixelFormat::RGBA8Unorm => MTLPixelFormat::RGBA8Unorm,
            PixelFormat::RGBA16Float => MTLPixelFormat::RGBA16Float,
        }
    }
}

impl From<IndexType> for MTLIndexType {
    #[inline]
    fn from(t: IndexType) -> Self {
        match t {
            IndexType::UInt16 => MTLIndexType::UInt16,
            IndexType::UInt32 => MTLIndexType::UInt32,
        }
    }
}

impl From<PrimitiveType> for MTLPrimitiveType {
    #[inline]
    fn from(p: PrimitiveType) -> Self {
        match p {
            PrimitiveType::Point => MTLPrimitiveType::Point,
            PrimitiveType::Line => MTLPrimitiveType::Line,
            PrimitiveType::LineStrip => MTLPrimitiveType::LineStrip,
            PrimitiveType::Triangle => MTLPrimitiveType::Triangle,
            PrimitiveType::TriangleStrip => MTLPrimitiveType::TriangleStrip,
        }
    }
}

impl From<VertexFormat> for MTLVertexFormat {
    #[inline]
    fn from(f: VertexFormat) -> Self {
        match f {
            VertexFormat::Float => MTLVertexFormat::Float,
            VertexFormat::Float2 => MTLVertexFormat::Float2,
            VertexFormat::Float3 => MTLVertexFormat::Float3,
            VertexFormat::Float4 => MTLVertexFormat::Float4,
            VertexFormat::Half2 => MTLVertexFormat::Half2,
            VertexFormat::Half4 => MTLVertexFormat::Half4,
            VertexFormat::Int => MTLVertexFormat::Int,
            VertexFormat::Int2 => MTLVertexFormat::Int2,
            VertexFormat::Int4 => MTLVertexFormat::Int4,
            VertexFormat::UInt => MTLVertexFormat::UInt,
            VertexFormat::UInt2 => MTLVertexFormat::UInt2,
            VertexFormat::UInt4 => MTLVertexFormat::UInt4,
        }
    }
}

impl From<VertexStepFunction> for MTLVertexStepFunction {
    #[inline]
    fn from(s: VertexStepFunction) -> Self {
        match s {
            VertexStepFunction::PerVertex => MTLVertexStepFunction::PerVertex,
            VertexStepFunction::PerInstance => MTLVertexStepFunction::PerInstance,
        }
    }
}

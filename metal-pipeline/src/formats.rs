use std::fmt::Display;

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PixelFormat {
    BGRA8Unorm,
    BGRA8Unorm_sRGB,
    RGBA8Unorm,
    RGBA16Float,
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::BGRA8Unorm
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IndexType {
    UInt16,
    UInt32,
}

impl IndexType {
    #[inline(always)]
    pub const fn byte_size(&self) -> usize {
        match self {
            IndexType::UInt16 => std::mem::size_of::<u16>(),
            IndexType::UInt32 => std::mem::size_of::<u32>(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PrimitiveType {
    Point,
    Line,
    LineStrip,
    Triangle,
    TriangleStrip,
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(
            match self {
                PrimitiveType::Point => "point",
                PrimitiveType::Line => "line",
                PrimitiveType::LineStrip => "line strip",
                PrimitiveType::Triangle => "triangle",
                PrimitiveType::TriangleStrip => "triangle strip",
            },
            f,
        )
    }
}

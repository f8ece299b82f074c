mod sphere;

pub use sphere::*;

use crate::{debug_time, IndexType, PipelineError, PrimitiveType, Result, VertexLayout};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum IndexData {
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
}

impl IndexData {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IndexData::UInt16(i) => i.len(),
            IndexData::UInt32(i) => i.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn index_type(&self) -> IndexType {
        match self {
            IndexData::UInt16(_) => IndexType::UInt16,
            IndexData::UInt32(_) => IndexType::UInt32,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::UInt16(i) => bytemuck::cast_slice(i),
            IndexData::UInt32(i) => bytemuck::cast_slice(i),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            IndexData::UInt16(i) => Box::new(i.iter().map(|&i| i as u32)),
            IndexData::UInt32(i) => Box::new(i.iter().copied()),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Submesh {
    pub name: String,
    pub primitive: PrimitiveType,
    pub indices: IndexData,
}

/// CPU-side mesh: one interleaved vertex stream described by `layout`, and its submeshes.
#[derive(Clone, PartialEq, Debug)]
pub struct MeshData {
    pub vertices: Vec<SphereVertex>,
    pub submeshes: Vec<Submesh>,
    pub layout: VertexLayout,
}

/// Allocates GPU-visible buffers for mesh data.
pub trait MeshBufferAllocator {
    type Buffer;

    fn new_buffer_with_data(&self, label: &str, bytes: &[u8]) -> Result<Self::Buffer>;
}

pub struct GpuSubmesh<B> {
    pub index_buffer: B,
    pub index_count: u64,
    pub index_type: IndexType,
    pub primitive: PrimitiveType,
}

pub struct GpuMesh<B> {
    pub vertex_buffers: Vec<B>,
    pub submeshes: Vec<GpuSubmesh<B>>,
    pub layout: VertexLayout,
}

impl<B> GpuMesh<B> {
    #[inline]
    pub fn first_submesh(&self) -> Result<&GpuSubmesh<B>> {
        self.submeshes.first().ok_or(PipelineError::NoSubmesh)
    }
}

pub fn upload_mesh<A: MeshBufferAllocator + ?Sized>(
    allocator: &A,
    mesh: &MeshData,
) -> Result<GpuMesh<A::Buffer>> {
    if mesh.submeshes.is_empty() {
        return Err(PipelineError::NoSubmesh);
    }
    debug_time("Mesh upload", || -> Result<GpuMesh<A::Buffer>> {
        let vertex_buffer =
            allocator.new_buffer_with_data("Vertices", bytemuck::cast_slice(&mesh.vertices))?;
        let submeshes = mesh
            .submeshes
            .iter()
            .map(|s| -> Result<GpuSubmesh<A::Buffer>> {
                Ok(GpuSubmesh {
                    index_buffer: allocator
                        .new_buffer_with_data(&format!("{} Indices", s.name), s.indices.as_bytes())?,
                    index_count: s.indices.len() as _,
                    index_type: s.indices.index_type(),
                    primitive: s.primitive,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "Uploaded mesh: {} vertices, {} submesh(es)",
            mesh.vertices.len(),
            submeshes.len()
        );
        Ok(GpuMesh {
            vertex_buffers: vec![vertex_buffer],
            submeshes,
            layout: mesh.layout.clone(),
        })
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::VecAllocator;

    #[test]
    fn test_upload_sphere() {
        let data = generate_sphere(&SphereDescriptor::default()).unwrap();
        let allocator = VecAllocator::default();
        let mesh = upload_mesh(&allocator, &data).unwrap();

        assert_eq!(mesh.vertex_buffers.len(), 1);
        assert_eq!(
            mesh.vertex_buffers[0].bytes.len(),
            data.vertices.len() * std::mem::size_of::<SphereVertex>()
        );
        assert_eq!(mesh.vertex_buffers[0].label, "Vertices");

        let submesh = mesh.first_submesh().unwrap();
        assert_eq!(submesh.index_count, data.submeshes[0].indices.len() as u64);
        assert_eq!(submesh.index_type, IndexType::UInt16);
        assert_eq!(submesh.primitive, PrimitiveType::Triangle);
        assert_eq!(
            submesh.index_buffer.bytes.len(),
            submesh.index_count as usize * IndexType::UInt16.byte_size()
        );
        assert_eq!(mesh.layout, data.layout);
        assert_eq!(allocator.allocations(), 2);
    }

    #[test]
    fn test_upload_without_submeshes() {
        let mut data = generate_sphere(&SphereDescriptor::default()).unwrap();
        data.submeshes.clear();
        let allocator = VecAllocator::default();
        assert!(matches!(
            upload_mesh(&allocator, &data),
            Err(PipelineError::NoSubmesh)
        ));
        assert_eq!(allocator.allocations(), 0);
    }

    #[test]
    fn test_upload_allocation_failure() {
        let data = generate_sphere(&SphereDescriptor::default()).unwrap();
        let allocator = VecAllocator::with_byte_limit(1024);
        assert!(matches!(
            upload_mesh(&allocator, &data),
            Err(PipelineError::BufferAllocation { label, .. }) if label == "Vertices"
        ));
    }

    #[test]
    fn test_index_data() {
        let indices = IndexData::UInt32(vec![0, 70_000, 2]);
        assert_eq!(indices.index_type(), IndexType::UInt32);
        assert_eq!(indices.as_bytes().len(), 12);
        assert_eq!(indices.iter().max(), Some(70_000));
        assert!(!indices.is_empty());
    }
}

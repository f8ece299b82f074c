use super::{IndexData, MeshData, Submesh};
use crate::{
    PipelineError, PrimitiveType, Result, VertexAttribute, VertexBufferLayout, VertexFormat,
    VertexLayout, VertexStepFunction,
};
use std::f32::consts::PI;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GeometryType {
    Triangles,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SphereDescriptor {
    /// Bounding box size. The sphere's radii are half of each component.
    pub extent: [f32; 3],
    /// `[radial, vertical]` segment counts.
    pub segments: [u32; 2],
    pub inward_normals: bool,
    pub geometry: GeometryType,
}

impl Default for SphereDescriptor {
    fn default() -> Self {
        Self {
            extent: [0.75, 0.75, 0.75],
            segments: [100, 100],
            inward_normals: false,
            geometry: GeometryType::Triangles,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

pub const ATTRIBUTE_POSITION: u32 = 0;
pub const ATTRIBUTE_NORMAL: u32 = 1;
pub const ATTRIBUTE_TEXCOORD: u32 = 2;

pub fn sphere_vertex_layout() -> VertexLayout {
    VertexLayout {
        attributes: vec![
            VertexAttribute {
                name: "position",
                index: ATTRIBUTE_POSITION,
                format: VertexFormat::Float3,
                offset: 0,
                buffer_index: 0,
            },
            VertexAttribute {
                name: "normal",
                index: ATTRIBUTE_NORMAL,
                format: VertexFormat::Float3,
                offset: 12,
                buffer_index: 0,
            },
            VertexAttribute {
                name: "textureCoordinate",
                index: ATTRIBUTE_TEXCOORD,
                format: VertexFormat::Float2,
                offset: 24,
                buffer_index: 0,
            },
        ],
        buffers: vec![VertexBufferLayout {
            stride: std::mem::size_of::<SphereVertex>(),
            step_function: VertexStepFunction::PerVertex,
        }],
    }
}

/*
UV sphere, rows running from the top pole (+y) to the bottom pole (-y), columns running around the
y axis. Each row/column boundary is a vertex, the seam column is duplicated so texture coordinates
wrap cleanly...

    row 0         p   p   p   p        (top pole, repeated per column)
                  | / | / | / |
    row 1         o---o---o---o
                  | / | / | / |
    row vertical  p   p   p   p        (bottom pole)

Triangles are counter-clockwise when viewed from outside. Pole rows emit a single triangle per
column (the other half of the quad is degenerate).
*/
pub fn generate_sphere(desc: &SphereDescriptor) -> Result<MeshData> {
    let SphereDescriptor {
        extent,
        segments: [radial, vertical],
        inward_normals,
        geometry: GeometryType::Triangles,
    } = *desc;
    if extent.iter().any(|e| !e.is_finite() || *e <= 0.0) {
        return Err(PipelineError::InvalidMesh(format!(
            "Sphere extent must be positive and finite, got {extent:?}"
        )));
    }
    if radial < 3 || vertical < 2 {
        return Err(PipelineError::InvalidMesh(format!(
            "Sphere needs at least 3 radial and 2 vertical segments, got [{radial}, {vertical}]"
        )));
    }

    let radii = extent.map(|e| e * 0.5);
    let columns = radial as usize + 1;
    let rows = vertical as usize + 1;
    // Every vertex must stay addressable by a 32-bit index.
    let num_vertices = columns
        .checked_mul(rows)
        .filter(|&n| u32::try_from(n - 1).is_ok())
        .ok_or_else(|| {
            PipelineError::InvalidMesh(format!(
                "Sphere with [{radial}, {vertical}] segments has more vertices than 32-bit indices can address"
            ))
        })?;
    let normal_sign = if inward_normals { -1.0 } else { 1.0 };

    let mut vertices = Vec::with_capacity(num_vertices);
    for row in 0..rows {
        let v = row as f32 / vertical as f32;
        let theta = v * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for column in 0..columns {
            let u = column as f32 / radial as f32;
            let phi = u * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let dir = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            let position = [dir[0] * radii[0], dir[1] * radii[1], dir[2] * radii[2]];
            // Ellipsoid normal: gradient of (x/a)^2 + (y/b)^2 + (z/c)^2
            let gradient = [
                dir[0] / radii[0],
                dir[1] / radii[1],
                dir[2] / radii[2],
            ];
            let length = gradient.iter().map(|g| g * g).sum::<f32>().sqrt();
            let normal = gradient.map(|g| normal_sign * g / length);
            vertices.push(SphereVertex {
                position,
                normal,
                uv: [u, v],
            });
        }
    }

    let index = |row: usize, column: usize| (row * columns + column) as u32;
    let pole_triangles = 2 * radial as usize;
    let body_triangles = 2 * radial as usize * (vertical as usize - 2);
    let mut indices = Vec::<u32>::with_capacity(3 * (pole_triangles + body_triangles));
    let mut push_triangle = |a: u32, b: u32, c: u32| {
        if inward_normals {
            indices.extend_from_slice(&[a, c, b]);
        } else {
            indices.extend_from_slice(&[a, b, c]);
        }
    };
    for row in 0..vertical as usize {
        for column in 0..radial as usize {
            let top_left = index(row, column);
            let top_right = index(row, column + 1);
            let bottom_left = index(row + 1, column);
            let bottom_right = index(row + 1, column + 1);
            if row != 0 {
                push_triangle(top_left, top_right, bottom_left);
            }
            if row != vertical as usize - 1 {
                push_triangle(top_right, bottom_right, bottom_left);
            }
        }
    }

    let indices = if num_vertices <= u16::MAX as usize + 1 {
        IndexData::UInt16(indices.into_iter().map(|i| i as u16).collect())
    } else {
        IndexData::UInt32(indices)
    };
    log::debug!(
        "Generated sphere: {} vertices, {} indices ({:?})",
        vertices.len(),
        indices.len(),
        indices.index_type()
    );

    Ok(MeshData {
        vertices,
        submeshes: vec![Submesh {
            name: "Sphere".to_owned(),
            primitive: PrimitiveType::Triangle,
            indices,
        }],
        layout: sphere_vertex_layout(),
    })
}

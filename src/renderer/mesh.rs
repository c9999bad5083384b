//! Triangulated view of a shape for drawing and picking

use crate::cad::{FaceId, Shape};
use bytemuck::{Pod, Zeroable};
use glam::DVec3;

/// Vertex of a shaded face
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Display-list handle of the owning shape
    pub shape: u32,
    pub face: u32,
}

impl MeshVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32x3,  // normal
        2 => Uint32,     // shape
        3 => Uint32,     // face
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Vertex of an edge line
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Triangle {
    face: FaceId,
    a: DVec3,
    b: DVec3,
    c: DVec3,
}

/// Triangles and edge lines of one shape
#[derive(Debug, Clone, Default)]
pub struct ShapeMesh {
    triangles: Vec<Triangle>,
    edges: Vec<(DVec3, DVec3)>,
}

impl ShapeMesh {
    /// Fan-triangulate every face; faces are convex
    pub fn build(shape: &Shape) -> Self {
        let mut triangles = Vec::new();
        for (face, polygon) in shape.faces.iter().enumerate() {
            let Some((&first, rest)) = polygon.vertices.split_first() else {
                continue;
            };
            for pair in rest.windows(2) {
                triangles.push(Triangle {
                    face,
                    a: first,
                    b: pair[0],
                    c: pair[1],
                });
            }
        }

        Self {
            triangles,
            edges: shape.edges(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Flat-shaded vertices tagged with the shape handle
    pub fn vertices(&self, shape: u32) -> Vec<MeshVertex> {
        let mut out = Vec::with_capacity(self.triangles.len() * 3);
        for t in &self.triangles {
            let normal = (t.b - t.a).cross(t.c - t.a).normalize_or_zero().as_vec3().to_array();
            for p in [t.a, t.b, t.c] {
                out.push(MeshVertex {
                    position: p.as_vec3().to_array(),
                    normal,
                    shape,
                    face: t.face as u32,
                });
            }
        }
        out
    }

    pub fn line_vertices(&self) -> Vec<LineVertex> {
        self.edges
            .iter()
            .flat_map(|(a, b)| [*a, *b])
            .map(|p| LineVertex {
                position: p.as_vec3().to_array(),
            })
            .collect()
    }

    /// Nearest face hit by the ray, with the hit distance
    pub fn intersect(&self, origin: DVec3, dir: DVec3) -> Option<(FaceId, f64)> {
        self.triangles
            .iter()
            .filter_map(|t| ray_triangle(origin, dir, t).map(|d| (t.face, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Möller–Trumbore, both windings
fn ray_triangle(origin: DVec3, dir: DVec3, t: &Triangle) -> Option<f64> {
    const EPS: f64 = 1e-12;

    let e1 = t.b - t.a;
    let e2 = t.c - t.a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }

    let inv = 1.0 / det;
    let s = origin - t.a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let distance = e2.dot(q) * inv;
    (distance > EPS).then_some(distance)
}

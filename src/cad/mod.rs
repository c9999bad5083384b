//! CAD kernel module for cadframe
//!
//! Solids are boundary representations made of planar polygonal faces.
//! The kernel builds box primitives, reports face normals and sweeps a
//! face into a prism. Faces are wound counter-clockwise when seen from
//! outside the solid, so a face's winding normal points outward.

pub mod poly_kernel;

pub use poly_kernel::PolyKernel;

use glam::DVec3;
use thiserror::Error;

pub type Vec3 = DVec3;

/// Errors raised by kernel operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Box dimensions must be positive and finite, got {0} x {1} x {2}")]
    InvalidDimensions(f64, f64, f64),

    #[error("Face needs at least 3 vertices, got {0}")]
    InvalidFace(usize),

    #[error("Face is not planar")]
    NonPlanarFace,

    #[error("Prism vector has zero length")]
    DegenerateVector,

    #[error("Prism vector lies in the face plane")]
    CoplanarVector,
}

/// Index of a face within its shape
pub type FaceId = usize;

/// A planar polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: Vec<Vec3>,
}

impl Face {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    /// Newell vector; its length is twice the polygon area
    pub fn newell(&self) -> Vec3 {
        let n = self.vertices.len();
        let mut normal = Vec3::ZERO;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal
    }

    pub fn area(&self) -> f64 {
        self.newell().length() * 0.5
    }

    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec3>() / self.vertices.len() as f64
    }

    /// Boundary edges in winding order
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Same polygon wound the other way
    pub fn reversed(&self) -> Face {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Face { vertices }
    }

    pub fn translated(&self, by: Vec3) -> Face {
        Face {
            vertices: self.vertices.iter().map(|v| *v + by).collect(),
        }
    }
}

/// A closed solid bounded by faces
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub faces: Vec<Face>,
}

impl Shape {
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Axis-aligned bounds, `None` for an empty shape
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.faces.iter().flat_map(|f| f.vertices.iter().copied());
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Distinct vertices, merged on a fine grid
    pub fn vertices(&self) -> Vec<Vec3> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for v in self.faces.iter().flat_map(|f| f.vertices.iter()) {
            if seen.insert(grid_key(*v)) {
                out.push(*v);
            }
        }
        out
    }

    /// Distinct undirected edges
    pub fn edges(&self) -> Vec<(Vec3, Vec3)> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (a, b) in self.faces.iter().flat_map(|f| f.edges()) {
            let (ka, kb) = (grid_key(a), grid_key(b));
            let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
            if seen.insert(key) {
                out.push((a, b));
            }
        }
        out
    }

    /// Enclosed volume; positive when faces are wound outward
    pub fn volume(&self) -> f64 {
        self.faces
            .iter()
            .filter_map(|f| f.vertices.first().map(|p| p.dot(f.newell())))
            .sum::<f64>()
            / 6.0
    }
}

fn grid_key(v: Vec3) -> (i64, i64, i64) {
    const SCALE: f64 = 1e9;
    (
        (v.x * SCALE).round() as i64,
        (v.y * SCALE).round() as i64,
        (v.z * SCALE).round() as i64,
    )
}

/// Geometry operations the workbench needs from a kernel
pub trait CadKernel {
    /// Axis-aligned box with one corner at the origin
    fn make_box(&self, dx: f64, dy: f64, dz: f64) -> Result<Shape, KernelError>;

    /// Outward unit normal of a planar face, `None` when the face is not planar
    fn face_normal(&self, face: &Face) -> Option<Vec3>;

    /// Sweep a face along a vector into a closed solid
    fn make_prism(&self, face: &Face, vector: Vec3) -> Result<Shape, KernelError>;
}

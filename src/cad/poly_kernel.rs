//! Planar polygon kernel

use crate::cad::{CadKernel, Face, KernelError, Shape, Vec3};
use log::debug;

/// Relative tolerance for planarity and degeneracy checks
const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default)]
pub struct PolyKernel;

impl PolyKernel {
    pub fn new() -> Self {
        Self
    }
}

impl CadKernel for PolyKernel {
    fn make_box(&self, dx: f64, dy: f64, dz: f64) -> Result<Shape, KernelError> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !(valid(dx) && valid(dy) && valid(dz)) {
            return Err(KernelError::InvalidDimensions(dx, dy, dz));
        }

        let p = |x: f64, y: f64, z: f64| Vec3::new(x, y, z);
        let faces = vec![
            // -Z
            Face::new(vec![p(0.0, 0.0, 0.0), p(0.0, dy, 0.0), p(dx, dy, 0.0), p(dx, 0.0, 0.0)]),
            // +Z
            Face::new(vec![p(0.0, 0.0, dz), p(dx, 0.0, dz), p(dx, dy, dz), p(0.0, dy, dz)]),
            // -Y
            Face::new(vec![p(0.0, 0.0, 0.0), p(dx, 0.0, 0.0), p(dx, 0.0, dz), p(0.0, 0.0, dz)]),
            // +Y
            Face::new(vec![p(0.0, dy, 0.0), p(0.0, dy, dz), p(dx, dy, dz), p(dx, dy, 0.0)]),
            // -X
            Face::new(vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, dz), p(0.0, dy, dz), p(0.0, dy, 0.0)]),
            // +X
            Face::new(vec![p(dx, 0.0, 0.0), p(dx, dy, 0.0), p(dx, dy, dz), p(dx, 0.0, dz)]),
        ];
        Ok(Shape::new(faces))
    }

    fn face_normal(&self, face: &Face) -> Option<Vec3> {
        if face.vertices.len() < 3 {
            return None;
        }

        let newell = face.newell();
        let extent = extent(face);
        if newell.length() <= TOLERANCE * extent * extent {
            return None;
        }
        let normal = newell.normalize();

        let centroid = face.centroid();
        let planar = face
            .vertices
            .iter()
            .all(|v| normal.dot(*v - centroid).abs() <= TOLERANCE * extent.max(1.0));
        planar.then_some(normal)
    }

    fn make_prism(&self, face: &Face, vector: Vec3) -> Result<Shape, KernelError> {
        if face.vertices.len() < 3 {
            return Err(KernelError::InvalidFace(face.vertices.len()));
        }
        if !vector.is_finite() || vector.length() <= TOLERANCE {
            return Err(KernelError::DegenerateVector);
        }
        let normal = self.face_normal(face).ok_or(KernelError::NonPlanarFace)?;

        let along = normal.dot(vector);
        if along.abs() <= TOLERANCE * vector.length() {
            return Err(KernelError::CoplanarVector);
        }

        // Wind the profile so its normal follows the sweep
        let profile = if along > 0.0 { face.clone() } else { face.reversed() };
        let top = profile.translated(vector);

        let mut faces = Vec::with_capacity(profile.vertices.len() + 2);
        faces.push(profile.reversed());
        for (a, b) in profile.edges() {
            faces.push(Face::new(vec![a, b, b + vector, a + vector]));
        }
        faces.push(top);

        debug!(
            "prism from {}-gon along {:?}: {} faces",
            profile.vertices.len(),
            vector,
            faces.len()
        );
        Ok(Shape::new(faces))
    }
}

fn extent(face: &Face) -> f64 {
    let first = face.vertices[0];
    let (lo, hi) = face
        .vertices
        .iter()
        .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    (hi - lo).length()
}

//! Orbit camera for the viewport
//!
//! Z is up. The eye sits on a sphere around `target`, parameterized by yaw
//! (around Z) and pitch (above the XY plane).

use glam::{DMat4, DVec3, Mat4};

const ORBIT_SPEED: f64 = 0.01;
const ZOOM_FACTOR: f64 = 0.9;
const PITCH_LIMIT: f64 = 1.55;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: DVec3,
    pub distance: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub fov_y: f64,

    /// Radius of the framed content, drives the clip planes and zoom limits
    radius: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: DVec3::ZERO,
            distance: 200.0,
            yaw: -std::f64::consts::FRAC_PI_4,
            pitch: 0.6,
            fov_y: 45f64.to_radians(),
            radius: 50.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> DVec3 {
        let dir = DVec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
        );
        self.target + dir * self.distance
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye(), self.target, DVec3::Z)
    }

    pub fn projection(&self, aspect: f64) -> DMat4 {
        let near = (self.distance - self.radius * 2.0).max(self.distance * 0.01);
        let far = self.distance + self.radius * 4.0;
        DMat4::perspective_rh(self.fov_y, aspect.max(1e-3), near, far)
    }

    pub fn view_projection(&self, aspect: f64) -> DMat4 {
        self.projection(aspect) * self.view()
    }

    /// Matrix in the form the shaders take
    pub fn uniform_matrix(&self, aspect: f64) -> Mat4 {
        self.view_projection(aspect).as_mat4()
    }

    /// Frame a bounding sphere so it fits the vertical field of view
    pub fn fit_sphere(&mut self, center: DVec3, radius: f64) {
        let radius = radius.max(1e-3);
        self.target = center;
        self.radius = radius;
        self.distance = radius / (self.fov_y * 0.5).sin() * 1.1;
    }

    pub fn fit_bounds(&mut self, lo: DVec3, hi: DVec3) {
        self.fit_sphere((lo + hi) * 0.5, (hi - lo).length() * 0.5);
    }

    /// Rotate by a pointer delta in pixels
    pub fn orbit(&mut self, dx: f64, dy: f64) {
        self.yaw -= dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive steps move closer
    pub fn zoom(&mut self, steps: f64) {
        let distance = self.distance * ZOOM_FACTOR.powf(steps);
        self.distance = distance.clamp(self.radius * 0.05, self.radius * 100.0);
    }

    /// World-space ray through a viewport pixel
    pub fn ray(&self, x: f64, y: f64, width: f64, height: f64) -> (DVec3, DVec3) {
        let ndc_x = 2.0 * x / width.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height.max(1.0);
        let inverse = self.view_projection(width / height.max(1.0)).inverse();

        let near = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        (near, (far - near).normalize())
    }
}

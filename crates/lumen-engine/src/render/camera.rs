use glam::{Mat4, Quat, Vec3, Vec4};

use crate::backend::GraphicsApi;

use super::context::RenderContext;
use super::shader::ShaderProgram;

/// Near clip plane distance.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance.
pub const FAR_PLANE: f32 = 100.0;

/// Perspective camera.
///
/// The orientation rotates the canonical view direction `-Z` (with `+Y` up) into
/// world space. Projections use a `[0, 1]` depth range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    orientation: Quat,
    up: Vec3,
    aspect: f32,
    fov_deg: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            up: Vec3::Y,
            aspect: 1280.0 / 720.0,
            fov_deg: 45.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_deg
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Stores the orientation as given; `camQuat` receives it unchanged.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Orients the camera to look along `direction`. A zero vector is ignored.
    pub fn set_look_direction(&mut self, direction: Vec3) {
        let Some(dir) = direction.try_normalize() else {
            log::debug!("ignoring zero camera look direction");
            return;
        };
        self.orientation = Quat::from_rotation_arc(Vec3::NEG_Z, dir);
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    /// Sets the aspect ratio from a pixel resolution. Zero sizes are ignored.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring camera resolution {width}x{height}");
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        } else {
            log::debug!("ignoring camera aspect {aspect}");
        }
    }

    /// Vertical field of view in degrees.
    pub fn set_fov_degrees(&mut self, fov_deg: f32) {
        self.fov_deg = fov_deg;
    }

    /// The orientation scaled to unit length. Zero or non-finite quaternions
    /// count as identity.
    fn unit_orientation(&self) -> Quat {
        Vec4::from(self.orientation)
            .try_normalize()
            .map(Quat::from_vec4)
            .unwrap_or(Quat::IDENTITY)
    }

    /// Unit view direction in world space.
    pub fn forward(&self) -> Vec3 {
        self.unit_orientation() * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.forward();
        match self.up.try_normalize() {
            Some(up) if forward.cross(up).length_squared() > 1e-12 => {
                Mat4::look_to_rh(self.position, forward, up)
            }
            // Degenerate up vector: fall back to the orientation's own frame.
            _ => Mat4::from_rotation_translation(self.unit_orientation(), self.position).inverse(),
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Writes `camPos`, `camQuat`, `projMat` and `camMatrix` to `program`.
    pub fn apply<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, program: &ShaderProgram) {
        program.set_vec3(ctx, "camPos", self.position.to_array());
        program.set_vec4(ctx, "camQuat", self.orientation.to_array());
        program.set_mat4(ctx, "projMat", &self.projection_matrix());
        program.set_mat4(ctx, "camMatrix", &self.view_projection());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert!(close(cam.forward(), Vec3::NEG_Z));
        let p = cam.view_projection().project_point3(Vec3::new(0.0, 0.0, -10.0));
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let cam = Camera::default();
        let proj = cam.projection_matrix();
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -NEAR_PLANE));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -FAR_PLANE));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn look_direction_sets_forward() {
        let mut cam = Camera::default();
        cam.set_look_direction(Vec3::new(1.0, 0.0, 0.0));
        assert!(close(cam.forward(), Vec3::X));

        cam.set_look_direction(Vec3::ZERO);
        assert!(close(cam.forward(), Vec3::X));
    }

    #[test]
    fn resolution_sets_aspect() {
        let mut cam = Camera::default();
        cam.set_resolution(800, 400);
        assert_eq!(cam.aspect(), 2.0);
        cam.set_resolution(0, 400);
        assert_eq!(cam.aspect(), 2.0);
    }

    #[test]
    fn new_camera_has_default_frame() {
        let cam = Camera::new();
        assert_eq!(cam, Camera::default());
        assert_eq!(cam.up(), Vec3::Y);
        assert_eq!(cam.fov_degrees(), 45.0);

        let mut cam = cam;
        cam.set_up(Vec3::X);
        cam.set_fov_degrees(70.0);
        assert_eq!(cam.up(), Vec3::X);
        assert_eq!(cam.fov_degrees(), 70.0);
    }

    #[test]
    fn orientation_is_kept_raw_but_matrices_use_its_direction() {
        let mut cam = Camera::default();
        let scaled = Quat::from_xyzw(0.0, 2.0, 0.0, 0.0);
        cam.set_orientation(scaled);
        assert_eq!(cam.orientation(), scaled);
        // Half-turn about Y looks down +Z.
        assert!(close(cam.forward(), Vec3::Z));

        cam.set_orientation(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert!(close(cam.forward(), Vec3::NEG_Z));
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn view_is_finite_when_up_is_parallel() {
        let mut cam = Camera::default();
        cam.set_up(Vec3::NEG_Z);
        assert!(cam.view_matrix().is_finite());
    }
}

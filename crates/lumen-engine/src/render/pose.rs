use glam::{Quat, Vec3};

/// Object placement: translation plus rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Builds a pose from host arrays: `p = [x, y, z]`, `q = [w, x, y, z]`.
    ///
    /// Returns `None` when either array is too short. Extra elements are ignored.
    pub fn from_host(p: &[f64], q: &[f64]) -> Option<Self> {
        let position = vec3_from_host(p)?;
        let orientation = quat_from_host(q)?;
        Some(Self {
            position,
            orientation,
        })
    }

    /// Position as written to `objPos`.
    pub fn position_array(&self) -> [f32; 3] {
        self.position.to_array()
    }

    /// Orientation in shader order `(x, y, z, w)`, as written to `objQuat`.
    pub fn orientation_xyzw(&self) -> [f32; 4] {
        self.orientation.to_array()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub(crate) fn vec3_from_host(p: &[f64]) -> Option<Vec3> {
    match p {
        [x, y, z, ..] => Some(Vec3::new(*x as f32, *y as f32, *z as f32)),
        _ => None,
    }
}

/// Scalar-first host quaternion `(w, x, y, z)`.
pub(crate) fn quat_from_host(q: &[f64]) -> Option<Quat> {
    match q {
        [w, x, y, z, ..] => Some(Quat::from_xyzw(*x as f32, *y as f32, *z as f32, *w as f32)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_quaternion_is_scalar_first() {
        let pose = Pose::from_host(&[1.0, 2.0, 3.0], &[0.5, 0.1, 0.2, 0.3]).unwrap();
        assert_eq!(pose.position_array(), [1.0, 2.0, 3.0]);
        assert_eq!(pose.orientation_xyzw(), [0.1, 0.2, 0.3, 0.5]);
    }

    #[test]
    fn short_arrays_are_rejected() {
        assert!(Pose::from_host(&[1.0, 2.0], &[1.0, 0.0, 0.0, 0.0]).is_none());
        assert!(Pose::from_host(&[0.0; 3], &[1.0, 0.0, 0.0]).is_none());
    }
}

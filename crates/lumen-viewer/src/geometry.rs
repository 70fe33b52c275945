//! Demo geometry in the engine's interleaved layouts.

use std::f32::consts::TAU;

/// Unit cube centred on the origin: 24 vertices (4 per face, flat normals) and
/// 36 indices. Each vertex is position, normal, RGBA.
pub fn cube(half: f32) -> (Vec<f32>, Vec<u32>) {
    // (normal, tangent u, tangent v, colour)
    let faces: [([f32; 3], [f32; 3], [f32; 3], [f32; 4]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [0.90, 0.30, 0.25, 1.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.25, 0.55, 0.90, 1.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.95, 0.85, 0.30, 1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.35, 0.80, 0.45, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.80, 0.40, 0.85, 1.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.40, 0.85, 0.85, 1.0]),
    ];

    let mut vertices = Vec::with_capacity(24 * 10);
    let mut indices = Vec::with_capacity(36);

    for (face, (n, u, v, colour)) in faces.iter().enumerate() {
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            for axis in 0..3 {
                vertices.push(half * (n[axis] + su * u[axis] + sv * v[axis]));
            }
            vertices.extend_from_slice(n);
            vertices.extend_from_slice(colour);
        }
        let base = face as u32 * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    (vertices, indices)
}

/// Point-cloud helix around the Y axis: position, RGBA per point.
pub fn helix(points: usize, radius: f32, turns: f32, height: f32) -> Vec<f32> {
    let mut vertices = Vec::with_capacity(points * 7);
    let last = points.saturating_sub(1).max(1) as f32;

    for i in 0..points {
        let t = i as f32 / last;
        let angle = t * turns * TAU;
        vertices.extend_from_slice(&[
            radius * angle.cos(),
            height * (t - 0.5),
            radius * angle.sin(),
            t,
            0.6,
            1.0 - t,
            1.0,
        ]);
    }

    vertices
}

/// Scalar-first quaternion `[w, x, y, z]` for a rotation of `angle` radians about `axis`.
pub fn axis_angle(axis: [f64; 3], angle: f64) -> [f64; 4] {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len == 0.0 {
        return [1.0, 0.0, 0.0, 0.0];
    }
    let (s, c) = (angle * 0.5).sin_cos();
    [c, s * axis[0] / len, s * axis[1] / len, s * axis[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_flat_faces() {
        let (v, i) = cube(0.5);
        assert_eq!(v.len(), 24 * 10);
        assert_eq!(i.len(), 36);
        assert!(i.iter().all(|&x| x < 24));

        // Every corner lies on the cube surface.
        for vertex in v.chunks_exact(10) {
            for c in &vertex[..3] {
                assert!((c.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn helix_spans_its_height() {
        let v = helix(100, 1.0, 3.0, 2.0);
        assert_eq!(v.len(), 700);
        assert!((v[1] + 1.0).abs() < 1e-6);
        assert!((v[99 * 7 + 1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn axis_angle_is_unit_length() {
        let q = axis_angle([0.0, 2.0, 0.0], 1.3);
        let n: f64 = q.iter().map(|x| x * x).sum();
        assert!((n - 1.0).abs() < 1e-12);
        assert_eq!(axis_angle([0.0; 3], 1.0), [1.0, 0.0, 0.0, 0.0]);
    }
}

//! Fixed uniform block shared by every program.
//!
//! wgpu has no name-based uniform reflection, so uniforms live in one block at
//! `@group(0) @binding(0)` whose layout is fixed here. Shader sources declare
//! the same struct (see [`WGSL_DECLARATION`]); the names are the contract.

use super::types::{UniformLocation, UniformValue};

/// Maximum number of point lights in `lightArray`.
pub const MAX_LIGHTS: usize = 16;

/// Floats per light in `lightArray`.
pub const FLOATS_PER_LIGHT: usize = 9;

const LIGHT_ARRAY_FLOATS: usize = MAX_LIGHTS * FLOATS_PER_LIGHT;

/// Size of the block in bytes.
pub const BLOCK_SIZE: usize = 256 + LIGHT_ARRAY_FLOATS * 4;

/// WGSL declaration matching the layout. Shader sources paste this verbatim.
pub const WGSL_DECLARATION: &str = "struct Uniforms {
    projMat: mat4x4<f32>,
    camMatrix: mat4x4<f32>,
    objPos: vec3<f32>,
    time: f32,
    objQuat: vec4<f32>,
    camPos: vec3<f32>,
    nlights: i32,
    camQuat: vec4<f32>,
    colour1: vec4<f32>,
    colour2: vec4<f32>,
    colour3: vec4<f32>,
    contrast: f32,
    spinRotation: f32,
    spinSpeed: f32,
    spinAmount: f32,
    lightArray: array<vec4<f32>, 36>,
}
@group(0) @binding(0) var<uniform> u: Uniforms;";

/// Value shape stored in a slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Int,
    Float,
    Vec3,
    Vec4,
    Mat4,
    /// Tightly packed floats, up to the given count.
    FloatArray(usize),
}

/// One named slot in the block.
#[derive(Debug, Copy, Clone)]
pub struct UniformSlot {
    pub name: &'static str,
    /// Byte offset inside the block.
    pub offset: usize,
    pub kind: UniformKind,
}

pub const SLOTS: &[UniformSlot] = &[
    UniformSlot { name: "projMat", offset: 0, kind: UniformKind::Mat4 },
    UniformSlot { name: "camMatrix", offset: 64, kind: UniformKind::Mat4 },
    UniformSlot { name: "objPos", offset: 128, kind: UniformKind::Vec3 },
    UniformSlot { name: "time", offset: 140, kind: UniformKind::Float },
    UniformSlot { name: "objQuat", offset: 144, kind: UniformKind::Vec4 },
    UniformSlot { name: "camPos", offset: 160, kind: UniformKind::Vec3 },
    UniformSlot { name: "nlights", offset: 172, kind: UniformKind::Int },
    UniformSlot { name: "camQuat", offset: 176, kind: UniformKind::Vec4 },
    UniformSlot { name: "colour1", offset: 192, kind: UniformKind::Vec4 },
    UniformSlot { name: "colour2", offset: 208, kind: UniformKind::Vec4 },
    UniformSlot { name: "colour3", offset: 224, kind: UniformKind::Vec4 },
    UniformSlot { name: "contrast", offset: 240, kind: UniformKind::Float },
    UniformSlot { name: "spinRotation", offset: 244, kind: UniformKind::Float },
    UniformSlot { name: "spinSpeed", offset: 248, kind: UniformKind::Float },
    UniformSlot { name: "spinAmount", offset: 252, kind: UniformKind::Float },
    UniformSlot {
        name: "lightArray",
        offset: 256,
        kind: UniformKind::FloatArray(LIGHT_ARRAY_FLOATS),
    },
];

/// Resolves a uniform name to its slot.
pub fn lookup(name: &str) -> Option<UniformLocation> {
    SLOTS
        .iter()
        .position(|s| s.name == name)
        .map(|i| UniformLocation(i as u32))
}

/// Returns the slot behind a location.
pub fn slot(location: UniformLocation) -> Option<&'static UniformSlot> {
    SLOTS.get(location.0 as usize)
}

/// Writes `value` into `block` at the slot for `location`.
///
/// Returns `false` (and leaves `block` untouched) when the location is unknown or
/// the value shape does not match the slot. Arrays longer than the slot are truncated.
pub fn write(block: &mut [u8], location: UniformLocation, value: &UniformValue) -> bool {
    let Some(slot) = slot(location) else { return false };

    let bytes: Vec<u8> = match (slot.kind, value) {
        (UniformKind::Int, UniformValue::Int(v)) => v.to_ne_bytes().to_vec(),
        (UniformKind::Float, UniformValue::Float(v)) => v.to_ne_bytes().to_vec(),
        (UniformKind::Vec3, UniformValue::Vec3(v)) => bytemuck::cast_slice(v).to_vec(),
        (UniformKind::Vec4, UniformValue::Vec4(v)) => bytemuck::cast_slice(v).to_vec(),
        (UniformKind::Mat4, UniformValue::Mat4(v)) => bytemuck::cast_slice(v).to_vec(),
        (UniformKind::FloatArray(cap), UniformValue::FloatArray(v)) => {
            bytemuck::cast_slice(&v[..v.len().min(cap)]).to_vec()
        }
        _ => return false,
    };

    let end = slot.offset + bytes.len();
    if end > block.len() {
        return false;
    }
    block[slot.offset..end].copy_from_slice(&bytes);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn slots_fit_inside_block() {
        for s in SLOTS {
            let size = match s.kind {
                UniformKind::Int | UniformKind::Float => 4,
                UniformKind::Vec3 => 12,
                UniformKind::Vec4 => 16,
                UniformKind::Mat4 => 64,
                UniformKind::FloatArray(n) => n * 4,
            };
            assert!(s.offset + size <= BLOCK_SIZE, "{} overflows the block", s.name);
        }
        assert_eq!(BLOCK_SIZE % 16, 0);
    }

    #[test]
    fn declaration_names_every_slot() {
        for s in SLOTS {
            assert!(WGSL_DECLARATION.contains(&format!("{}:", s.name)), "{}", s.name);
        }
    }

    #[test]
    fn unknown_name_has_no_location() {
        assert!(lookup("objPos").is_some());
        assert!(lookup("objpos").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn write_rejects_mismatched_shape() {
        let mut block = vec![0u8; BLOCK_SIZE];
        let loc = lookup("objPos").unwrap();
        assert!(!write(&mut block, loc, &UniformValue::Float(1.0)));
        assert!(block.iter().all(|b| *b == 0));

        assert!(write(&mut block, loc, &UniformValue::Vec3([1.0, 2.0, 3.0])));
        assert_eq!(floats(&block[128..140]), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn light_array_is_truncated_to_capacity() {
        let mut block = vec![0u8; BLOCK_SIZE];
        let loc = lookup("lightArray").unwrap();
        let data = vec![1.0f32; LIGHT_ARRAY_FLOATS + 20];
        assert!(write(&mut block, loc, &UniformValue::FloatArray(data)));
        assert!(floats(&block[256..]).iter().all(|f| *f == 1.0));
    }
}

use bytemuck::{Pod, Zeroable};

use crate::backend::GraphicsApi;
use crate::backend::uniform_block::{FLOATS_PER_LIGHT, MAX_LIGHTS};

use super::context::RenderContext;
use super::shader::ShaderProgram;

/// One point light: position, colour and attenuation terms.
///
/// Laid out exactly as one `lightArray` entry.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// Constant, linear and quadratic attenuation.
    pub attenuation: [f32; 3],
}

/// The scene's light list as uploaded to `lightArray` / `nlights`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightSet {
    lights: Vec<PointLight>,
}

impl LightSet {
    pub fn new(lights: Vec<PointLight>) -> Self {
        let mut set = Self { lights };
        set.cap();
        set
    }

    /// Builds the set from a flat array of 9 floats per light.
    ///
    /// A trailing partial light is ignored.
    pub fn from_flat(data: &[f32]) -> Self {
        if data.len() % FLOATS_PER_LIGHT != 0 {
            log::debug!(
                "light array length {} is not a multiple of {FLOATS_PER_LIGHT}; ignoring the tail",
                data.len()
            );
        }
        let whole = data.len() - data.len() % FLOATS_PER_LIGHT;
        let lights: &[PointLight] = bytemuck::cast_slice(&data[..whole]);
        Self::new(lights.to_vec())
    }

    fn cap(&mut self) {
        if self.lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} lights given, only the first {MAX_LIGHTS} are used",
                self.lights.len()
            );
            self.lights.truncate(MAX_LIGHTS);
        }
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn flat(&self) -> Vec<f32> {
        bytemuck::cast_slice(&self.lights).to_vec()
    }

    /// Uploads the lights and their count to `program`.
    pub fn apply<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, program: &ShaderProgram) {
        program.set_float_array(ctx, "lightArray", &self.flat());
        program.set_int(ctx, "nlights", self.lights.len() as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_is_nine_floats() {
        assert_eq!(std::mem::size_of::<PointLight>(), FLOATS_PER_LIGHT * 4);
    }

    #[test]
    fn trailing_floats_are_ignored() {
        let mut data: Vec<f32> = (0..18).map(|i| i as f32).collect();
        data.extend([1.0, 2.0]);
        let set = LightSet::from_flat(&data);

        assert_eq!(set.len(), 2);
        assert_eq!(set.lights()[1].position, [9.0, 10.0, 11.0]);
        assert_eq!(set.lights()[1].attenuation, [15.0, 16.0, 17.0]);
        assert_eq!(set.flat(), data[..18].to_vec());
    }

    #[test]
    fn count_is_capped() {
        let data = vec![0.5; FLOATS_PER_LIGHT * (MAX_LIGHTS + 3)];
        assert_eq!(LightSet::from_flat(&data).len(), MAX_LIGHTS);
    }

    #[test]
    fn empty_input_gives_no_lights() {
        assert!(LightSet::from_flat(&[1.0; 8]).is_empty());
    }
}

use crate::backend::GraphicsApi;

use super::context::RenderContext;
use super::shader::ShaderProgram;

/// Parameters of the animated background shader.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BackgroundStyle {
    pub time: f32,
    pub contrast: f32,
    pub spin_rotation: f32,
    pub spin_speed: f32,
    pub spin_amount: f32,
    pub colour1: [f32; 4],
    pub colour2: [f32; 4],
    pub colour3: [f32; 4],
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            time: 0.0,
            contrast: 3.5,
            spin_rotation: -2.0,
            spin_speed: 7.0,
            spin_amount: 0.25,
            colour1: [0.871, 0.267, 0.231, 1.0],
            colour2: [0.0, 0.42, 0.706, 1.0],
            colour3: [0.086, 0.137, 0.145, 1.0],
        }
    }
}

impl BackgroundStyle {
    pub fn apply<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, program: &ShaderProgram) {
        program.set_float(ctx, "time", self.time);
        program.set_float(ctx, "contrast", self.contrast);
        program.set_float(ctx, "spinRotation", self.spin_rotation);
        program.set_float(ctx, "spinSpeed", self.spin_speed);
        program.set_float(ctx, "spinAmount", self.spin_amount);
        program.set_vec4(ctx, "colour1", self.colour1);
        program.set_vec4(ctx, "colour2", self.colour2);
        program.set_vec4(ctx, "colour3", self.colour3);
    }
}

use std::path::Path;

use anyhow::Result;
use glam::Vec3;

use crate::backend::{GraphicsApi, WgpuBackend};
use crate::render::{Camera, ContextConfig, Mesh, Pose, RenderContext, ShaderProgram, Strictness};

use super::{open_context, settle, try_open_context, unusable};

/// Single-mesh renderer with a look-direction camera.
///
/// Per frame: [`clear`](Self::clear), [`render`](Self::render),
/// [`update`](Self::update), optionally [`framerate_limit`](Self::framerate_limit).
/// Call [`delete`](Self::delete) once at the end.
pub struct MeshRenderer<G: GraphicsApi = WgpuBackend> {
    ctx: Option<RenderContext<G>>,
    program: Option<ShaderProgram>,
    mesh: Option<Mesh>,
    camera: Camera,
    strictness: Strictness,
}

impl MeshRenderer<WgpuBackend> {
    /// Opens a window. On failure the error is logged and the renderer is inert.
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        let mut renderer = Self::from_parts(open_context(title, width, height), Strictness::Permissive);
        renderer.camera.set_resolution(width, height);
        renderer
    }

    pub fn try_new(config: ContextConfig) -> Result<Self> {
        let (width, height) = (config.window.width, config.window.height);
        let strictness = config.strictness;
        let mut renderer = Self::from_parts(Some(try_open_context(config)?), strictness);
        renderer.camera.set_resolution(width, height);
        Ok(renderer)
    }
}

impl<G: GraphicsApi> MeshRenderer<G> {
    /// Wraps an existing context.
    pub fn with_context(ctx: RenderContext<G>) -> Self {
        let strictness = ctx.strictness();
        Self::from_parts(Some(ctx), strictness)
    }

    fn from_parts(ctx: Option<RenderContext<G>>, strictness: Strictness) -> Self {
        Self {
            ctx,
            program: None,
            mesh: None,
            camera: Camera::default(),
            strictness,
        }
    }

    /// Loads, compiles and links the shader pair, replacing any previous program.
    pub fn init_shader_program(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<()> {
        let Some(ctx) = self.ctx.as_mut() else {
            return settle(self.strictness, Err(unusable()));
        };

        if let Some(old) = self.program.take() {
            old.release(ctx);
        }

        let program = ShaderProgram::from_files(ctx, vertex_path, fragment_path);
        let outcome = if program.is_linked() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "shader program failed to build: {}",
                program.diagnostics().join("; ")
            ))
        };
        self.program = Some(program);
        settle(self.strictness, outcome)
    }

    /// Uploads the mesh, replacing any previous one.
    pub fn init_buffers(&mut self, vertices: &[f32], indices: &[u32]) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        if let Some(old) = self.mesh.take() {
            old.release(ctx);
        }
        self.mesh = Some(Mesh::upload(ctx, vertices, indices));
    }

    pub fn clear(&mut self) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.clear();
        }
    }

    /// Draws the mesh at the origin with a `fov_deg` vertical field of view.
    pub fn render(&mut self, fov_deg: f32) {
        let (Some(ctx), Some(program), Some(mesh)) =
            (self.ctx.as_mut(), self.program.as_ref(), self.mesh.as_ref())
        else {
            log::debug!("render skipped: shader program or mesh missing");
            return;
        };

        self.camera.set_fov_degrees(fov_deg);
        program.use_program(ctx);
        self.camera.apply(ctx, program);
        mesh.draw(ctx, program, &Pose::IDENTITY);
    }

    /// Presents the frame and processes window events.
    pub fn update(&mut self) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.present();
        }
    }

    /// Key codes currently held down.
    pub fn get_inputs(&self) -> Vec<i32> {
        self.ctx
            .as_ref()
            .map(RenderContext::poll_pressed_keys)
            .unwrap_or_default()
    }

    /// Waits for the next frame slot; returns seconds since the previous one.
    pub fn framerate_limit(&mut self, fps: f64) -> f64 {
        self.ctx
            .as_mut()
            .map(|ctx| ctx.capacity_limited_tick(fps).dt)
            .unwrap_or(0.0)
    }

    /// Points the camera along `(x, y, z)`.
    pub fn set_camera_orientation(&mut self, x: f32, y: f32, z: f32) {
        self.camera.set_look_direction(Vec3::new(x, y, z));
    }

    pub fn set_camera_position(&mut self, x: f32, y: f32, z: f32) {
        self.camera.set_position(Vec3::new(x, y, z));
    }

    pub fn set_camera_up(&mut self, x: f32, y: f32, z: f32) {
        self.camera.set_up(Vec3::new(x, y, z));
    }

    pub fn set_camera_resolution(&mut self, width: u32, height: u32) {
        self.camera.set_resolution(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Writes the last presented frame to a PNG.
    pub fn save_image(&mut self, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
        let outcome = match self.ctx.as_mut() {
            Some(ctx) => ctx.capture_frame(path, width, height),
            None => Err(unusable()),
        };
        settle(self.strictness, outcome)
    }

    /// True once the window was asked to close, or if there is no window.
    pub fn window_should_close(&self) -> bool {
        self.ctx.as_ref().is_none_or(RenderContext::should_close)
    }

    /// Releases the mesh, the program and the window. Later calls are no-ops.
    pub fn delete(&mut self) {
        let Some(mut ctx) = self.ctx.take() else { return };
        if let Some(mesh) = self.mesh.take() {
            mesh.release(&mut ctx);
        }
        if let Some(program) = self.program.take() {
            program.release(&mut ctx);
        }
        ctx.destroy();
        log::info!("mesh renderer deleted");
    }
}

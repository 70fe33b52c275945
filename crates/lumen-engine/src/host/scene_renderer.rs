use std::path::Path;

use anyhow::Result;

use crate::backend::{GraphicsApi, WgpuBackend};
use crate::render::{
    quat_from_host, vec3_from_host, BackgroundStyle, Camera, Cloud, ContextConfig, LightSet, Mesh,
    Pose, RenderContext, ShaderProgram, Strictness,
};

use super::{open_context, settle, try_open_context, unusable};

/// Which of the two programs an operation targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ProgramSlot {
    Mesh,
    Cloud,
}

impl ProgramSlot {
    fn name(self) -> &'static str {
        match self {
            ProgramSlot::Mesh => "mesh",
            ProgramSlot::Cloud => "cloud",
        }
    }
}

/// Multi-object renderer: any number of meshes and point clouds, point lights
/// and an animated background.
///
/// Meshes and clouds are addressed by the index returned from
/// [`init_mesh`](Self::init_mesh) / [`init_cloud`](Self::init_cloud). Poses come
/// from the host as `p = [x, y, z]` and scalar-first `q = [w, x, y, z]`.
pub struct SceneRenderer<G: GraphicsApi = WgpuBackend> {
    ctx: Option<RenderContext<G>>,
    mesh_program: Option<ShaderProgram>,
    cloud_program: Option<ShaderProgram>,
    meshes: Vec<Mesh>,
    clouds: Vec<Cloud>,
    camera: Camera,
    strictness: Strictness,
}

impl SceneRenderer<WgpuBackend> {
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

impl<G: GraphicsApi> SceneRenderer<G> {
    /// Wraps an existing context.
    pub fn with_context(ctx: RenderContext<G>) -> Self {
        let strictness = ctx.strictness();
        Self::from_parts(Some(ctx), strictness)
    }

    fn from_parts(ctx: Option<RenderContext<G>>, strictness: Strictness) -> Self {
        Self {
            ctx,
            mesh_program: None,
            cloud_program: None,
            meshes: Vec::new(),
            clouds: Vec::new(),
            camera: Camera::default(),
            strictness,
        }
    }

    fn program_slot(&mut self, slot: ProgramSlot) -> &mut Option<ShaderProgram> {
        match slot {
            ProgramSlot::Mesh => &mut self.mesh_program,
            ProgramSlot::Cloud => &mut self.cloud_program,
        }
    }

    fn init_program(
        &mut self,
        slot: ProgramSlot,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<()> {
        let Some(mut ctx) = self.ctx.take() else {
            return settle(self.strictness, Err(unusable()));
        };

        if let Some(old) = self.program_slot(slot).take() {
            old.release(&mut ctx);
        }

        let program = ShaderProgram::from_files(&mut ctx, vertex_path, fragment_path);
        let outcome = if program.is_linked() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "{} shader program failed to build: {}",
                slot.name(),
                program.diagnostics().join("; ")
            ))
        };

        *self.program_slot(slot) = Some(program);
        self.ctx = Some(ctx);
        settle(self.strictness, outcome)
    }

    pub fn init_mesh_shader_program(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<()> {
        self.init_program(ProgramSlot::Mesh, vertex_path.as_ref(), fragment_path.as_ref())
    }

    pub fn init_cloud_shader_program(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<()> {
        self.init_program(ProgramSlot::Cloud, vertex_path.as_ref(), fragment_path.as_ref())
    }

    fn use_program(&mut self, slot: ProgramSlot) {
        let program = match slot {
            ProgramSlot::Mesh => self.mesh_program.as_ref(),
            ProgramSlot::Cloud => self.cloud_program.as_ref(),
        };
        match (self.ctx.as_mut(), program) {
            (Some(ctx), Some(program)) => program.use_program(ctx),
            (Some(_), None) => log::warn!("no {} shader program to use", slot.name()),
            (None, _) => {}
        }
    }

    pub fn use_mesh_shader_program(&mut self) {
        self.use_program(ProgramSlot::Mesh);
    }

    pub fn use_cloud_shader_program(&mut self) {
        self.use_program(ProgramSlot::Cloud);
    }

    /// Uploads a mesh and returns its index, or `None` without a context.
    pub fn init_mesh(&mut self, vertices: &[f32], indices: &[u32]) -> Option<usize> {
        let ctx = self.ctx.as_mut()?;
        self.meshes.push(Mesh::upload(ctx, vertices, indices));
        Some(self.meshes.len() - 1)
    }

    /// Uploads a point cloud and returns its index, or `None` without a context.
    pub fn init_cloud(&mut self, vertices: &[f32]) -> Option<usize> {
        let ctx = self.ctx.as_mut()?;
        self.clouds.push(Cloud::upload(ctx, vertices));
        Some(self.clouds.len() - 1)
    }

    /// Replaces mesh `index`'s vertices with a same-length payload.
    pub fn update_mesh_buffer(&mut self, index: usize, vertices: &[f32]) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        match self.meshes.get_mut(index) {
            Some(mesh) => {
                mesh.reupload(ctx, vertices);
            }
            None => log::warn!("update_mesh_buffer: no mesh at index {index}"),
        }
    }

    /// Replaces cloud `index`'s vertices with a same-length payload.
    pub fn update_cloud_buffer(&mut self, index: usize, vertices: &[f32]) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        match self.clouds.get_mut(index) {
            Some(cloud) => {
                cloud.reupload(ctx, vertices);
            }
            None => log::warn!("update_cloud_buffer: no cloud at index {index}"),
        }
    }

    pub fn clear(&mut self) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.clear();
        }
    }

    /// Draws mesh `index` with the mesh program at pose `(p, q)`.
    pub fn draw_mesh(&mut self, index: usize, p: &[f64], q: &[f64]) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        let Some(mesh) = self.meshes.get(index) else {
            log::warn!("draw_mesh: no mesh at index {index}");
            return;
        };
        let Some(program) = self.mesh_program.as_ref() else {
            log::warn!("draw_mesh: no mesh shader program");
            return;
        };
        let Some(pose) = Pose::from_host(p, q) else {
            log::warn!("draw_mesh: pose needs 3 position and 4 quaternion values");
            return;
        };
        mesh.draw(ctx, program, &pose);
    }

    /// Draws cloud `index` with the cloud program at pose `(p, q)`.
    pub fn draw_cloud(&mut self, index: usize, p: &[f64], q: &[f64]) {
        let Some(ctx) = self.ctx.as_mut() else { return };
        let Some(cloud) = self.clouds.get(index) else {
            log::warn!("draw_cloud: no cloud at index {index}");
            return;
        };
        let Some(program) = self.cloud_program.as_ref() else {
            log::warn!("draw_cloud: no cloud shader program");
            return;
        };
        let Some(pose) = Pose::from_host(p, q) else {
            log::warn!("draw_cloud: pose needs 3 position and 4 quaternion values");
            return;
        };
        cloud.draw(ctx, program, &pose);
    }

    /// Moves the camera and writes its uniforms to both programs.
    pub fn set_camera(&mut self, p: &[f64], q: &[f64], fov_deg: f32, aspect: f32) {
        let (Some(position), Some(orientation)) = (vec3_from_host(p), quat_from_host(q)) else {
            log::warn!("set_camera: needs 3 position and 4 quaternion values");
            return;
        };
        self.camera.set_position(position);
        self.camera.set_orientation(orientation);
        self.camera.set_fov_degrees(fov_deg);
        self.camera.set_aspect(aspect);

        let Some(ctx) = self.ctx.as_mut() else { return };
        for program in [self.mesh_program.as_ref(), self.cloud_program.as_ref()]
            .into_iter()
            .flatten()
        {
            self.camera.apply(ctx, program);
        }
    }

    /// Uploads lights to the mesh program: 9 floats per light
    /// (position, colour, attenuation).
    pub fn set_lights(&mut self, light_data: &[f32]) {
        let (Some(ctx), Some(program)) = (self.ctx.as_mut(), self.mesh_program.as_ref()) else {
            return;
        };
        LightSet::from_flat(light_data).apply(ctx, program);
    }

    /// Writes the background parameters to the mesh program.
    pub fn set_background(&mut self, style: &BackgroundStyle) {
        let (Some(ctx), Some(program)) = (self.ctx.as_mut(), self.mesh_program.as_ref()) else {
            return;
        };
        style.apply(ctx, program);
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

    /// True once the window was asked to close, or if there is no window.
    pub fn window_should_close(&self) -> bool {
        self.ctx.as_ref().is_none_or(RenderContext::should_close)
    }

    /// Writes the last presented frame to a PNG.
    pub fn save_image(&mut self, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
        let outcome = match self.ctx.as_mut() {
            Some(ctx) => ctx.capture_frame(path, width, height),
            None => Err(unusable()),
        };
        settle(self.strictness, outcome)
    }

    /// Seconds since the renderer was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.ctx.as_ref().map(RenderContext::elapsed_secs).unwrap_or(0.0)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds.len()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Releases every drawable, both programs and the window. Later calls are no-ops.
    pub fn delete(&mut self) {
        let Some(mut ctx) = self.ctx.take() else { return };

        let (meshes, clouds) = (self.meshes.len(), self.clouds.len());
        for mesh in self.meshes.drain(..) {
            mesh.release(&mut ctx);
        }
        for cloud in self.clouds.drain(..) {
            cloud.release(&mut ctx);
        }
        for program in [self.mesh_program.take(), self.cloud_program.take()]
            .into_iter()
            .flatten()
        {
            program.release(&mut ctx);
        }

        ctx.destroy();
        log::info!("scene renderer deleted ({meshes} meshes, {clouds} clouds)");
    }
}

use std::io::ErrorKind;
use std::path::Path;

use glam::Mat4;

use crate::backend::{GraphicsApi, ProgramId, ShaderId, ShaderStage, UniformLocation, UniformValue};

use super::context::{RenderContext, Strictness};

/// A linked vertex + fragment program.
///
/// Construction never fails: compile and link problems are logged and kept in
/// [`diagnostics`](Self::diagnostics), and the program stays inert (draws with it
/// are skipped by the backend).
#[derive(Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    linked: bool,
    diagnostics: Vec<String>,
}

impl ShaderProgram {
    /// Compiles both stages, links them and deletes the stage objects.
    pub fn compile<G: GraphicsApi>(
        ctx: &mut RenderContext<G>,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Self {
        let api = ctx.api_mut();
        let mut diagnostics = Vec::new();

        let vs = compile_stage(api, ShaderStage::Vertex, vertex_src, &mut diagnostics);
        let fs = compile_stage(api, ShaderStage::Fragment, fragment_src, &mut diagnostics);

        let id = api.link_program(vs, fs);
        let linked = match api.program_info_log(id) {
            None => true,
            Some(log) => {
                log::error!("shader linking error: {log}");
                diagnostics.push(format!("link: {log}"));
                false
            }
        };

        api.delete_shader(vs);
        api.delete_shader(fs);

        if linked {
            log::debug!("shader program {} linked", id.raw());
        }

        Self {
            id,
            linked,
            diagnostics,
        }
    }

    /// Reads both stage sources from disk, then [`compile`](Self::compile)s them.
    pub fn from_files<G: GraphicsApi>(
        ctx: &mut RenderContext<G>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Self {
        let vertex_src = read_source(vertex_path.as_ref());
        let fragment_src = read_source(fragment_path.as_ref());
        Self::compile(ctx, &vertex_src, &fragment_src)
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Compile and link messages collected while building the program.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn use_program<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>) {
        ctx.api_mut().use_program(self.id);
    }

    /// The one place uniform names are resolved.
    ///
    /// Unknown names resolve to `None`; strict contexts log them.
    pub fn uniform_location<G: GraphicsApi>(
        &self,
        ctx: &RenderContext<G>,
        name: &str,
    ) -> Option<UniformLocation> {
        let location = ctx.api().uniform_location(self.id, name);
        if location.is_none() && self.linked && ctx.strictness() == Strictness::Strict {
            log::warn!("uniform '{name}' not found in program {}", self.id.raw());
        }
        location
    }

    /// Writes `value` to the uniform `name`. Unknown names are ignored.
    pub fn set_uniform<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, value: UniformValue) {
        let Some(location) = self.uniform_location(ctx, name) else {
            return;
        };
        ctx.api_mut().set_uniform(self.id, location, &value);
    }

    pub fn set_int<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, v: i32) {
        self.set_uniform(ctx, name, UniformValue::Int(v));
    }

    pub fn set_float<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, v: f32) {
        self.set_uniform(ctx, name, UniformValue::Float(v));
    }

    pub fn set_vec3<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, v: [f32; 3]) {
        self.set_uniform(ctx, name, UniformValue::Vec3(v));
    }

    pub fn set_vec4<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, v: [f32; 4]) {
        self.set_uniform(ctx, name, UniformValue::Vec4(v));
    }

    pub fn set_mat4<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, m: &Mat4) {
        self.set_uniform(ctx, name, UniformValue::Mat4(m.to_cols_array()));
    }

    pub fn set_float_array<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, name: &str, v: &[f32]) {
        self.set_uniform(ctx, name, UniformValue::FloatArray(v.to_vec()));
    }

    /// Deletes the program.
    pub fn release<G: GraphicsApi>(self, ctx: &mut RenderContext<G>) {
        ctx.api_mut().delete_program(self.id);
    }
}

fn compile_stage<G: GraphicsApi>(
    api: &mut G,
    stage: ShaderStage,
    source: &str,
    diagnostics: &mut Vec<String>,
) -> ShaderId {
    let id = api.compile_shader(stage, source);
    if let Some(log) = api.shader_info_log(id) {
        log::error!("shader compilation error for {stage}: {log}");
        diagnostics.push(format!("{stage}: {log}"));
    }
    id
}

/// Reads a shader source file. Failures are logged and yield an empty source.
pub(crate) fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(src) => src,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::error!("no file found: {}", path.display());
            String::new()
        }
        Err(e) => {
            log::error!("failed to read shader file {}: {e}", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Call, RecordingBackend};

    const VS: &str = "@vertex fn vs() {}";
    const FS: &str = "@fragment fn fs() {}";

    fn ctx(strictness: Strictness) -> (RecordingBackend, RenderContext<RecordingBackend>) {
        let backend = RecordingBackend::new(4, 4);
        let ctx = RenderContext::from_api(backend.clone(), strictness);
        (backend, ctx)
    }

    #[test]
    fn stages_are_deleted_after_link() {
        let (backend, mut ctx) = ctx(Strictness::Permissive);
        let program = ShaderProgram::compile(&mut ctx, VS, FS);
        assert!(program.is_linked());
        assert!(program.diagnostics().is_empty());

        let counts = backend.counts();
        assert_eq!(counts.shaders_created, 2);
        assert_eq!(counts.shaders_deleted, 2);
        assert_eq!(counts.programs_created, 1);
    }

    #[test]
    fn failing_stage_is_reported_by_name() {
        let (backend, mut ctx) = ctx(Strictness::Permissive);
        backend.fail_stage(ShaderStage::Fragment);

        let program = ShaderProgram::compile(&mut ctx, VS, FS);
        assert!(!program.is_linked());
        assert!(program.diagnostics()[0].starts_with("FRAGMENT"));
        assert!(program.diagnostics().iter().any(|d| d.starts_with("link")));
    }

    #[test]
    fn missing_file_yields_empty_source() {
        let missing = std::env::temp_dir().join("lumen-no-such-shader.wgsl");
        assert_eq!(read_source(&missing), "");

        let (_, mut ctx) = ctx(Strictness::Permissive);
        let program = ShaderProgram::from_files(&mut ctx, &missing, &missing);
        assert!(!program.is_linked());
    }

    #[test]
    fn unknown_uniform_is_a_no_op() {
        let (backend, mut ctx) = ctx(Strictness::Strict);
        let program = ShaderProgram::compile(&mut ctx, VS, FS);
        backend.clear_calls();

        program.set_float(&mut ctx, "doesNotExist", 1.0);
        assert!(backend.calls().is_empty());

        program.set_float(&mut ctx, "time", 2.5);
        assert_eq!(backend.uniform(program.id(), "time"), Some(UniformValue::Float(2.5)));
        assert!(matches!(backend.calls()[0], Call::SetUniform { name: "time", .. }));
    }
}

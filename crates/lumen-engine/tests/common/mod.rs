#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use lumen_engine::backend::RecordingBackend;
use lumen_engine::render::{RenderContext, Strictness};

pub const VERTEX_SRC: &str = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
pub const FRAGMENT_SRC: &str = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

static NEXT: AtomicUsize = AtomicUsize::new(0);

pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A path under the temp dir that no other test uses.
pub fn unique_path(stem: &str, ext: &str) -> PathBuf {
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("lumen-{stem}-{}-{n}.{ext}", std::process::id()))
}

/// Writes a working vertex/fragment pair to disk.
pub fn shader_files() -> (PathBuf, PathBuf) {
    let vs = unique_path("vs", "wgsl");
    let fs = unique_path("fs", "wgsl");
    std::fs::write(&vs, VERTEX_SRC).unwrap();
    std::fs::write(&fs, FRAGMENT_SRC).unwrap();
    (vs, fs)
}

pub fn context(
    width: u32,
    height: u32,
    strictness: Strictness,
) -> (RecordingBackend, RenderContext<RecordingBackend>) {
    init_test_logging();
    let backend = RecordingBackend::new(width, height);
    let ctx = RenderContext::from_api(backend.clone(), strictness);
    (backend, ctx)
}

/// `n` mesh vertices (10 floats each).
pub fn mesh_vertices(n: usize) -> Vec<f32> {
    (0..n * 10).map(|i| i as f32 * 0.01).collect()
}

/// `n` cloud vertices (7 floats each).
pub fn cloud_vertices(n: usize) -> Vec<f32> {
    (0..n * 7).map(|i| i as f32 * 0.01).collect()
}

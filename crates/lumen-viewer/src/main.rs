//! Demo host for the lumen engine.
//!
//! Renders a spinning cube, a point-cloud helix and two orbiting lights through
//! the `SceneRenderer` facade. Settings come from the environment:
//! - `LUMEN_SHADER_DIR`: directory holding the `*.wgsl` files (default: the
//!   crate's `shaders/`)
//! - `LUMEN_FPS`: frame rate cap, `0` for none (default 60)
//! - `LUMEN_SCREENSHOT`: if set, the 120th frame is saved there as PNG

mod geometry;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lumen_engine::host::SceneRenderer;
use lumen_engine::input::KeyCode;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::render::{BackgroundStyle, ContextConfig, Strictness};
use lumen_engine::window::WindowConfig;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const SCREENSHOT_FRAME: u64 = 120;

struct Settings {
    shader_dir: PathBuf,
    fps: f64,
    screenshot: Option<PathBuf>,
}

impl Settings {
    fn from_env() -> Result<Self> {
        let shader_dir = env::var_os("LUMEN_SHADER_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders"));

        let fps = match env::var("LUMEN_FPS") {
            Ok(raw) => raw
                .parse::<f64>()
                .with_context(|| format!("LUMEN_FPS is not a number: {raw:?}"))?,
            Err(_) => 60.0,
        };

        Ok(Self {
            shader_dir,
            fps,
            screenshot: env::var_os("LUMEN_SCREENSHOT").map(PathBuf::from),
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let settings = Settings::from_env()?;

    let mut scene = SceneRenderer::try_new(ContextConfig {
        window: WindowConfig {
            title: "lumen viewer".to_string(),
            width: WIDTH,
            height: HEIGHT,
        },
        clear_color: [0.02, 0.02, 0.03, 1.0],
        strictness: Strictness::Strict,
        ..Default::default()
    })?;

    let result = run(&mut scene, &settings);
    scene.delete();
    result
}

fn run(scene: &mut SceneRenderer, settings: &Settings) -> Result<()> {
    let dir = &settings.shader_dir;
    scene.init_mesh_shader_program(dir.join("mesh.vert.wgsl"), dir.join("mesh.frag.wgsl"))?;
    scene.init_cloud_shader_program(dir.join("cloud.vert.wgsl"), dir.join("cloud.frag.wgsl"))?;

    let (cube_vertices, cube_indices) = geometry::cube(0.75);
    let cube = scene
        .init_mesh(&cube_vertices, &cube_indices)
        .context("no render context for the cube")?;
    let mut helix_vertices = geometry::helix(2048, 1.8, 5.0, 3.0);
    let helix = scene
        .init_cloud(&helix_vertices)
        .context("no render context for the helix")?;

    // Slightly above the origin, looking down at it.
    let camera_pos = [0.0, 1.5, 6.0];
    let camera_rot = geometry::axis_angle([1.0, 0.0, 0.0], -(1.5f64).atan2(6.0));
    let aspect = WIDTH as f32 / HEIGHT as f32;

    let mut frame: u64 = 0;
    log::info!("viewer running; press Escape to quit");

    while !scene.window_should_close() {
        let t = scene.elapsed_secs();

        scene.clear();
        scene.set_camera(&camera_pos, &camera_rot, 45.0, aspect);
        scene.set_background(&BackgroundStyle {
            time: t as f32,
            ..Default::default()
        });
        scene.set_lights(&lights(t as f32));

        scene.use_mesh_shader_program();
        scene.draw_mesh(cube, &[0.0; 3], &geometry::axis_angle([0.3, 1.0, 0.2], t * 0.8));

        // Breathe the helix radius to exercise streaming re-uploads.
        let scale = 1.0 + 0.1 * (t as f32 * 1.5).sin();
        for point in helix_vertices.chunks_exact_mut(7) {
            let r = (point[0] * point[0] + point[2] * point[2]).sqrt().max(1e-6);
            point[0] *= 1.8 * scale / r;
            point[2] *= 1.8 * scale / r;
        }
        scene.update_cloud_buffer(helix, &helix_vertices);

        scene.use_cloud_shader_program();
        scene.draw_cloud(helix, &[0.0; 3], &geometry::axis_angle([0.0, 1.0, 0.0], -t * 0.3));

        scene.update();
        frame += 1;

        if frame == SCREENSHOT_FRAME {
            if let Some(path) = &settings.screenshot {
                scene.save_image(path, WIDTH, HEIGHT)?;
            }
        }

        if scene.get_inputs().contains(&KeyCode::ESCAPE.code()) {
            log::info!("escape pressed, closing");
            break;
        }

        scene.framerate_limit(settings.fps);
    }

    log::info!("viewer stopped after {frame} frames");
    Ok(())
}

/// Two coloured lights orbiting the cube, 9 floats each.
fn lights(t: f32) -> Vec<f32> {
    let (s, c) = (t * 0.7).sin_cos();
    vec![
        3.0 * c, 2.0, 3.0 * s, //
        1.0, 0.85, 0.7, //
        1.0, 0.05, 0.01, //
        -3.0 * s, -1.0, 3.0 * c, //
        0.4, 0.6, 1.0, //
        1.0, 0.09, 0.03,
    ]
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use lumen_engine::backend::uniform_block::SLOTS;

    const SHADERS: [&str; 4] = ["mesh.vert.wgsl", "mesh.frag.wgsl", "cloud.vert.wgsl", "cloud.frag.wgsl"];

    fn shader(name: &str) -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders").join(name);
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn shaders_declare_the_uniform_block() {
        for name in SHADERS {
            let src = shader(name);
            for slot in SLOTS {
                assert!(src.contains(&format!("{}:", slot.name)), "{name} lacks {}", slot.name);
            }
            assert!(src.contains("@group(0) @binding(0) var<uniform> u: Uniforms;"));
        }
    }

    #[test]
    fn each_shader_has_one_entry_point() {
        for name in SHADERS {
            let src = shader(name);
            let attr = if name.contains(".vert.") { "@vertex" } else { "@fragment" };
            assert_eq!(src.matches(attr).count(), 1, "{name}");
        }
    }

    #[test]
    fn lights_are_nine_floats_each() {
        assert_eq!(super::lights(0.0).len(), 18);
    }
}

mod common;

use lumen_engine::backend::{Call, PlatformEvent, Primitive, RecordingBackend, UniformValue};
use lumen_engine::host::{MeshRenderer, SceneRenderer};
use lumen_engine::render::{BackgroundStyle, Strictness};

use common::*;

const IDENTITY_Q: [f64; 4] = [1.0, 0.0, 0.0, 0.0];

fn scene(strictness: Strictness) -> (RecordingBackend, SceneRenderer<RecordingBackend>) {
    let (backend, ctx) = context(64, 48, strictness);
    (backend, SceneRenderer::with_context(ctx))
}

#[test]
fn scene_teardown_frees_everything_it_allocated() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let (vs, fs) = shader_files();

    scene.init_mesh_shader_program(&vs, &fs).unwrap();
    scene.init_cloud_shader_program(&vs, &fs).unwrap();
    // Re-init releases the previous program.
    scene.init_mesh_shader_program(&vs, &fs).unwrap();

    let m0 = scene.init_mesh(&mesh_vertices(4), &[0, 1, 2, 2, 3, 0]).unwrap();
    let m1 = scene.init_mesh(&mesh_vertices(3), &[0, 1, 2]).unwrap();
    let c0 = scene.init_cloud(&cloud_vertices(10)).unwrap();
    assert_eq!((m0, m1, c0), (0, 1, 0));

    scene.clear();
    scene.draw_mesh(m1, &[0.0; 3], &IDENTITY_Q);
    scene.draw_cloud(c0, &[0.0; 3], &IDENTITY_Q);
    scene.update();

    assert!(backend.live_objects() > 0);
    scene.delete();
    scene.delete();

    let counts = backend.counts();
    assert!(counts.balanced(), "{counts:?}");
    assert_eq!(counts.programs_created, 3);
    assert_eq!(counts.buffers_created, 5);
    assert_eq!(backend.live_objects(), 0);
    assert!(backend.is_terminated());
    assert_eq!(backend.calls().iter().filter(|c| **c == Call::Terminate).count(), 1);
    assert!(scene.window_should_close());
}

#[test]
fn out_of_range_index_is_a_no_op() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let (vs, fs) = shader_files();
    scene.init_mesh_shader_program(&vs, &fs).unwrap();
    scene.init_mesh(&mesh_vertices(3), &[0, 1, 2]);
    backend.clear_calls();

    scene.draw_mesh(3, &[0.0; 3], &IDENTITY_Q);
    scene.draw_cloud(0, &[0.0; 3], &IDENTITY_Q);
    scene.update_mesh_buffer(7, &mesh_vertices(3));
    scene.update_cloud_buffer(0, &cloud_vertices(1));

    assert!(backend.calls().is_empty());
    scene.delete();
}

#[test]
fn short_pose_arrays_skip_the_draw() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let (vs, fs) = shader_files();
    scene.init_mesh_shader_program(&vs, &fs).unwrap();
    let m = scene.init_mesh(&mesh_vertices(3), &[0, 1, 2]).unwrap();
    backend.clear_calls();

    scene.draw_mesh(m, &[0.0; 2], &IDENTITY_Q);
    assert!(backend.draw_calls().is_empty());
    scene.delete();
}

#[test]
fn camera_lights_and_background_reach_the_programs() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let (vs, fs) = shader_files();
    scene.init_mesh_shader_program(&vs, &fs).unwrap();
    scene.init_cloud_shader_program(&vs, &fs).unwrap();
    scene.use_mesh_shader_program();

    // Half-turn about Y, scalar-first on the host side.
    scene.set_camera(&[1.0, 2.0, 3.0], &[0.0, 0.0, 1.0, 0.0], 60.0, 2.0);

    let mut lights = vec![0.5f32; 18];
    lights.push(9.0);
    scene.set_lights(&lights);
    scene.set_background(&BackgroundStyle {
        time: 4.0,
        ..Default::default()
    });

    let calls = backend.calls();
    let mesh_program = match calls.iter().find(|c| matches!(c, Call::UseProgram(_))) {
        Some(Call::UseProgram(p)) => *p,
        _ => panic!("mesh program was not bound"),
    };

    assert_eq!(
        backend.uniform(mesh_program, "camPos"),
        Some(UniformValue::Vec3([1.0, 2.0, 3.0]))
    );
    assert_eq!(
        backend.uniform(mesh_program, "camQuat"),
        Some(UniformValue::Vec4([0.0, 1.0, 0.0, 0.0]))
    );
    assert!(matches!(backend.uniform(mesh_program, "projMat"), Some(UniformValue::Mat4(_))));
    assert!(matches!(backend.uniform(mesh_program, "camMatrix"), Some(UniformValue::Mat4(_))));
    assert_eq!(backend.uniform(mesh_program, "nlights"), Some(UniformValue::Int(2)));
    assert_eq!(
        backend.uniform(mesh_program, "lightArray"),
        Some(UniformValue::FloatArray(vec![0.5; 18]))
    );
    assert_eq!(backend.uniform(mesh_program, "time"), Some(UniformValue::Float(4.0)));

    let camera_writes = calls
        .iter()
        .filter(|c| matches!(c, Call::SetUniform { name: "camPos", .. }))
        .count();
    assert_eq!(camera_writes, 2);

    scene.delete();
}

#[test]
fn camera_and_object_quaternions_are_written_unnormalized() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let (vs, fs) = shader_files();
    scene.init_mesh_shader_program(&vs, &fs).unwrap();
    let m = scene.init_mesh(&mesh_vertices(3), &[0, 1, 2]).unwrap();
    scene.use_mesh_shader_program();
    let program = backend.current_program().expect("mesh program bound");

    let doubled = [2.0, 0.0, 0.0, 0.0];
    scene.set_camera(&[0.0; 3], &doubled, 45.0, 1.5);
    scene.draw_mesh(m, &[0.0; 3], &doubled);

    assert_eq!(
        backend.uniform(program, "camQuat"),
        Some(UniformValue::Vec4([0.0, 0.0, 0.0, 2.0]))
    );
    assert_eq!(
        backend.uniform(program, "objQuat"),
        Some(UniformValue::Vec4([0.0, 0.0, 0.0, 2.0]))
    );
    scene.delete();
}

#[test]
fn programs_switch_and_drawables_are_counted() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let (vs, fs) = shader_files();
    scene.init_mesh_shader_program(&vs, &fs).unwrap();
    scene.init_cloud_shader_program(&vs, &fs).unwrap();

    scene.use_mesh_shader_program();
    let mesh_program = backend.current_program();
    scene.use_cloud_shader_program();
    let cloud_program = backend.current_program();
    assert!(mesh_program.is_some() && cloud_program.is_some());
    assert_ne!(mesh_program, cloud_program);

    assert_eq!((scene.mesh_count(), scene.cloud_count()), (0, 0));
    scene.init_mesh(&mesh_vertices(3), &[0, 1, 2]);
    scene.init_cloud(&cloud_vertices(4));
    scene.init_cloud(&cloud_vertices(2));
    assert_eq!((scene.mesh_count(), scene.cloud_count()), (1, 2));

    scene.delete();
    assert_eq!(backend.current_program(), None);
    assert_eq!((scene.mesh_count(), scene.cloud_count()), (0, 0));
}

#[test]
fn close_event_and_inputs_flow_through_update() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let esc = lumen_engine::input::KeyCode::ESCAPE;

    backend.script_events(vec![PlatformEvent::Key { code: esc, pressed: true }]);
    scene.update();
    assert_eq!(scene.get_inputs(), vec![256]);
    assert!(!scene.window_should_close());

    backend.script_events(vec![PlatformEvent::CloseRequested]);
    scene.update();
    assert!(scene.window_should_close());
    scene.delete();
}

#[test]
fn missing_shader_file_is_logged_in_permissive_mode() {
    let (backend, mut scene) = scene(Strictness::Permissive);
    let missing = unique_path("missing", "wgsl");

    assert!(scene.init_mesh_shader_program(&missing, &missing).is_ok());
    let m = scene.init_mesh(&mesh_vertices(3), &[0, 1, 2]).unwrap();
    scene.draw_mesh(m, &[0.0; 3], &IDENTITY_Q);

    // The inert program is still handed to the backend, which skips the draw.
    assert_eq!(backend.draw_calls().len(), 1);
    scene.delete();
    assert!(backend.counts().balanced());
}

#[test]
fn strict_mode_returns_errors() {
    let (_backend, mut scene) = scene(Strictness::Strict);
    let missing = unique_path("missing-strict", "wgsl");
    assert!(scene.init_cloud_shader_program(&missing, &missing).is_err());
    assert!(scene.save_image(unique_path("strict", "png"), 0, 0).is_err());
    scene.delete();
    assert!(scene.save_image(unique_path("strict", "png"), 4, 4).is_err());
}

#[test]
fn mesh_renderer_frame_cycle() {
    let (backend, ctx) = context(64, 48, Strictness::Permissive);
    let mut renderer = MeshRenderer::with_context(ctx);
    let (vs, fs) = shader_files();

    renderer.init_shader_program(&vs, &fs).unwrap();
    renderer.init_buffers(&mesh_vertices(4), &[0, 1, 2, 2, 3, 0]);
    renderer.set_camera_position(0.0, 0.0, 5.0);
    renderer.set_camera_orientation(0.0, 0.0, -1.0);
    renderer.set_camera_up(0.0, 1.0, 0.0);
    renderer.set_camera_resolution(640, 480);
    backend.clear_calls();

    renderer.clear();
    renderer.render(45.0);
    renderer.update();
    renderer.framerate_limit(1000.0);

    let calls = backend.calls();
    assert_eq!(calls.first(), Some(&Call::Clear));
    assert!(matches!(
        backend.draw_calls().as_slice(),
        [Call::DrawElements { primitive: Primitive::Triangles, count: 6, .. }]
    ));
    assert_eq!(&calls[calls.len() - 2..], &[Call::SwapBuffers, Call::PollEvents]);

    let path = unique_path("mesh-renderer", "png");
    renderer.save_image(&path, 8, 6).unwrap();
    assert_eq!(image::open(&path).unwrap().to_rgb8().dimensions(), (8, 6));
    std::fs::remove_file(&path).ok();

    // Replacing the mesh frees the old buffers.
    renderer.init_buffers(&mesh_vertices(3), &[0, 1, 2]);
    renderer.delete();
    assert!(backend.counts().balanced());
    assert!(renderer.get_inputs().is_empty());
}

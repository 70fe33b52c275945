mod common;

use lumen_engine::backend::{BufferTarget, BufferUsage, Call, Primitive};
use lumen_engine::render::{Cloud, Mesh, Pose, ShaderProgram, Strictness};

use common::*;

#[test]
fn mesh_draw_is_one_indexed_call_sized_to_indices() {
    let (backend, mut ctx) = context(32, 32, Strictness::Permissive);
    let program = ShaderProgram::compile(&mut ctx, VERTEX_SRC, FRAGMENT_SRC);
    let mesh = Mesh::upload(&mut ctx, &mesh_vertices(4), &[0, 1, 2, 2, 3, 0]);
    backend.clear_calls();

    mesh.draw(&mut ctx, &program, &Pose::IDENTITY);

    let draws = backend.draw_calls();
    assert_eq!(draws.len(), 1);
    match &draws[0] {
        Call::DrawElements { program: p, primitive, count, .. } => {
            assert_eq!(*p, program.id());
            assert_eq!(*primitive, Primitive::Triangles);
            assert_eq!(*count, 6);
        }
        other => panic!("unexpected draw {other:?}"),
    }
    assert_eq!(mesh.element_count(), 6);
}

#[test]
fn cloud_draw_is_one_point_call_sized_to_vertices() {
    let (backend, mut ctx) = context(32, 32, Strictness::Permissive);
    let program = ShaderProgram::compile(&mut ctx, VERTEX_SRC, FRAGMENT_SRC);
    let cloud = Cloud::upload(&mut ctx, &cloud_vertices(9));
    backend.clear_calls();

    cloud.draw(&mut ctx, &program, &Pose::IDENTITY);

    let draws = backend.draw_calls();
    assert_eq!(draws.len(), 1);
    assert!(matches!(
        draws[0],
        Call::DrawArrays { primitive: Primitive::Points, count: 9, .. }
    ));
}

#[test]
fn draw_writes_pose_before_drawing() {
    let (backend, mut ctx) = context(32, 32, Strictness::Permissive);
    let program = ShaderProgram::compile(&mut ctx, VERTEX_SRC, FRAGMENT_SRC);
    let mesh = Mesh::upload(&mut ctx, &mesh_vertices(3), &[0, 1, 2]);
    backend.clear_calls();

    let pose = Pose::from_host(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 0.0]).unwrap();
    mesh.draw(&mut ctx, &program, &pose);

    let calls = backend.calls();
    let names: Vec<&str> = calls
        .iter()
        .filter_map(|c| match c {
            Call::SetUniform { name, .. } => Some(*name),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["objPos", "objQuat"]);
    assert!(matches!(calls.last(), Some(Call::DrawElements { .. })));
}

#[test]
fn same_size_reupload_orphans_then_fills() {
    let (backend, mut ctx) = context(32, 32, Strictness::Permissive);
    let vertices = mesh_vertices(5);
    let mut mesh = Mesh::upload(&mut ctx, &vertices, &[0, 1, 2]);
    let (count, bytes) = (mesh.element_count(), mesh.byte_size());
    backend.clear_calls();

    let shifted: Vec<f32> = vertices.iter().map(|v| v + 1.0).collect();
    assert!(mesh.reupload(&mut ctx, &shifted));

    let size = shifted.len() * 4;
    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    match (&calls[0], &calls[1]) {
        (
            Call::BufferData { buffer: a, target: BufferTarget::Array, size: s0, with_data: false, usage: BufferUsage::Stream },
            Call::BufferData { buffer: b, target: BufferTarget::Array, size: s1, with_data: true, usage: BufferUsage::Stream },
        ) => {
            assert_eq!(a, b);
            assert_eq!((*s0, *s1), (size, size));
            assert_eq!(backend.buffer_size(*a), Some(size));
        }
        other => panic!("unexpected calls {other:?}"),
    }

    assert_eq!(mesh.element_count(), count);
    assert_eq!(mesh.byte_size(), bytes);
}

#[test]
fn cloud_reupload_keeps_point_count() {
    let (backend, mut ctx) = context(32, 32, Strictness::Permissive);
    let mut cloud = Cloud::upload(&mut ctx, &cloud_vertices(12));
    backend.clear_calls();

    assert!(cloud.reupload(&mut ctx, &cloud_vertices(12)));
    assert!(!cloud.reupload(&mut ctx, &cloud_vertices(13)));
    assert_eq!(backend.calls().len(), 2);
    assert_eq!(cloud.element_count(), 12);
    assert_eq!(cloud.byte_size(), 12 * 7 * 4);
}

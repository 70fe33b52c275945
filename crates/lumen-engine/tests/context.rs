mod common;

use std::time::{Duration, Instant};

use lumen_engine::backend::{Call, PlatformEvent, RecordingBackend};
use lumen_engine::input::KeyCode;
use lumen_engine::render::{row_stride, Strictness};

use common::*;

fn key(code: KeyCode, pressed: bool) -> PlatformEvent {
    PlatformEvent::Key { code, pressed }
}

#[test]
fn tick_never_returns_early() {
    let (_backend, mut ctx) = context(8, 8, Strictness::Permissive);
    let period = Duration::from_secs_f64(1.0 / 200.0);

    ctx.capacity_limited_tick(200.0);
    for _ in 0..5 {
        let before = Instant::now();
        let frame = ctx.capacity_limited_tick(200.0);
        assert!(before.elapsed() <= period + Duration::from_millis(250));
        assert!(frame.dt >= period.as_secs_f64());
    }
}

#[test]
fn tick_without_limit_returns_immediately() {
    let (_backend, mut ctx) = context(8, 8, Strictness::Permissive);
    let before = Instant::now();
    for _ in 0..100 {
        ctx.capacity_limited_tick(0.0);
        ctx.capacity_limited_tick(-5.0);
    }
    assert!(before.elapsed() < Duration::from_millis(500));
}

#[test]
fn pressed_keys_reflect_state_at_poll_time() {
    let (backend, mut ctx) = context(8, 8, Strictness::Permissive);
    let a = KeyCode::letter('A').unwrap();
    let w = KeyCode::letter('W').unwrap();

    backend.script_events(vec![key(w, true), key(KeyCode::ESCAPE, true)]);
    ctx.present();
    assert_eq!(ctx.poll_pressed_keys(), vec![87, 256]);
    assert!(ctx.is_key_down(w));
    assert!(!ctx.is_key_down(a));

    // Held keys repeat; a tap between two polls shows up in neither.
    backend.script_events(vec![key(a, true), key(a, false), key(KeyCode::ESCAPE, false)]);
    ctx.present();
    assert_eq!(ctx.poll_pressed_keys(), vec![87]);
    assert!(!ctx.is_key_down(KeyCode::ESCAPE));

    backend.script_events(vec![PlatformEvent::FocusLost]);
    ctx.present();
    assert!(ctx.poll_pressed_keys().is_empty());
}

#[test]
fn request_close_marks_the_context_closing() {
    let (backend, mut ctx) = context(8, 8, Strictness::Permissive);
    assert!(!ctx.should_close());
    ctx.request_close();
    assert!(ctx.should_close());

    // Later frames with no close event do not reopen it.
    ctx.present();
    assert!(ctx.should_close());
    assert_eq!(backend.calls(), vec![Call::SwapBuffers, Call::PollEvents]);
}

#[test]
fn capture_writes_png_of_requested_size() {
    let (backend, mut ctx) = context(16, 8, Strictness::Permissive);
    let path = unique_path("capture", "png");

    ctx.capture_frame(&path, 5, 3).unwrap();
    assert!(backend.calls().contains(&Call::ReadFrontBuffer { width: 5, height: 3 }));

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (5, 3));
    // Top row of the file is the highest framebuffer row read.
    let top = RecordingBackend::front_pixel(4, 2);
    let bottom = RecordingBackend::front_pixel(0, 0);
    assert_eq!(img.get_pixel(4, 0).0, top);
    assert_eq!(img.get_pixel(0, 2).0, bottom);

    std::fs::remove_file(&path).ok();
}

#[test]
fn read_back_rows_are_four_byte_aligned() {
    for w in [1u32, 2, 3, 5, 7, 641] {
        assert_eq!(row_stride(w) % 4, 0);
        assert!(row_stride(w) >= w as usize * 3);
    }
}

#[test]
fn capture_larger_than_framebuffer_is_zero_filled() {
    let (_backend, mut ctx) = context(2, 2, Strictness::Permissive);
    let path = unique_path("capture-big", "png");

    ctx.capture_frame(&path, 4, 4).unwrap();
    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 4));
    assert_eq!(img.get_pixel(3, 0).0, [0, 0, 0]);

    std::fs::remove_file(&path).ok();
}

use std::path::Path;

use anyhow::{Context, Result};

use crate::backend::{GraphicsApi, PlatformEvent, WgpuBackend};
use crate::device::GpuInit;
use crate::input::{KeyCode, KeyboardState};
use crate::time::{FrameLimiter, FrameTime};
use crate::window::WindowConfig;

use super::capture::{FrameReadback, CAPTURE_ROW_ALIGNMENT};

/// How failures surface to the caller.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Strictness {
    /// Log and keep going. Failed objects become inert.
    #[default]
    Permissive,
    /// Return errors from facade calls; warn about unknown uniform names.
    Strict,
}

/// Render context configuration.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    pub window: WindowConfig,
    pub gpu: GpuInit,
    /// Clear color as linear RGBA.
    pub clear_color: [f64; 4],
    pub strictness: Strictness,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gpu: GpuInit::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            strictness: Strictness::Permissive,
        }
    }
}

/// One window, its GPU state, frame pacing and the keyboard snapshot.
///
/// Thread-affine: create, use and destroy it on the same thread.
pub struct RenderContext<G: GraphicsApi = WgpuBackend> {
    api: G,
    limiter: FrameLimiter,
    keyboard: KeyboardState,
    close_requested: bool,
    strictness: Strictness,
}

impl RenderContext<WgpuBackend> {
    /// Opens a `width x height` window titled `title` with default settings.
    pub fn create(title: &str, width: u32, height: u32) -> Result<Self> {
        Self::with_config(ContextConfig {
            window: WindowConfig {
                title: title.to_string(),
                width,
                height,
            },
            ..Default::default()
        })
    }

    pub fn with_config(config: ContextConfig) -> Result<Self> {
        let ContextConfig {
            window,
            gpu,
            clear_color,
            strictness,
        } = config;

        anyhow::ensure!(
            window.width > 0 && window.height > 0,
            "window size must be non-zero, got {}x{}",
            window.width,
            window.height
        );

        let api = WgpuBackend::open(&window, &gpu, clear_color)
            .with_context(|| format!("failed to create render context '{}'", window.title))?;

        Ok(Self::from_api(api, strictness))
    }
}

impl<G: GraphicsApi> RenderContext<G> {
    /// Wraps an already opened backend.
    pub fn from_api(api: G, strictness: Strictness) -> Self {
        Self {
            api,
            limiter: FrameLimiter::new(),
            keyboard: KeyboardState::new(),
            close_requested: false,
            strictness,
        }
    }

    pub fn api(&self) -> &G {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut G {
        &mut self.api
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Clears color and depth of the back buffer.
    pub fn clear(&mut self) {
        self.api.clear();
    }

    /// Presents the back buffer, then processes pending window events.
    pub fn present(&mut self) {
        self.api.swap_buffers();

        for ev in self.api.poll_events() {
            self.keyboard.apply(&ev);
            if ev == PlatformEvent::CloseRequested {
                self.close_requested = true;
            }
        }
    }

    /// Spin-waits until `1 / target_fps` seconds have passed since the previous tick.
    pub fn capacity_limited_tick(&mut self, target_fps: f64) -> FrameTime {
        self.limiter.tick(target_fps)
    }

    /// Key codes held down as of the last [`present`](Self::present), ascending.
    pub fn poll_pressed_keys(&self) -> Vec<i32> {
        self.keyboard.pressed_codes()
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.keyboard.is_down(code)
    }

    /// Writes the bottom-left `width x height` region of the front buffer to a PNG.
    pub fn capture_frame(&mut self, path: impl AsRef<Path>, width: u32, height: u32) -> Result<()> {
        let path = path.as_ref();
        anyhow::ensure!(
            width > 0 && height > 0,
            "capture size must be non-zero, got {width}x{height}"
        );

        let pixels = self
            .api
            .read_front_buffer(width, height, CAPTURE_ROW_ALIGNMENT)
            .context("failed to read the front buffer")?;

        let frame = FrameReadback::from_bottom_up(width, height, pixels)?;
        frame.save_png(path)?;

        log::info!("saved {width}x{height} capture to {}", path.display());
        Ok(())
    }

    /// True once the window system asked the window to close.
    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// Marks the window as closing, as if the user had closed it.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Seconds since the context was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.limiter.elapsed_secs()
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.api.framebuffer_size()
    }

    /// Closes the window and releases the backend.
    pub fn destroy(mut self) {
        self.api.terminate();
    }
}

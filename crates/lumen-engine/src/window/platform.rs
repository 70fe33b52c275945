use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::backend::PlatformEvent;
use crate::input::platform::winit::translate_key_event;

/// Upper bound on pumps spent waiting for the first `resumed`.
const MAX_STARTUP_PUMPS: u32 = 500;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// A single window driven by a pumped event loop.
pub struct PlatformWindow {
    event_loop: EventLoop<()>,
    pump: EventPump,
}

struct EventPump {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    events: Vec<PlatformEvent>,
    create_error: Option<anyhow::Error>,
}

impl PlatformWindow {
    /// Creates the event loop and the window.
    ///
    /// winit only allows window creation from inside the loop, so this pumps until
    /// the window exists.
    pub fn open(config: WindowConfig) -> Result<(Self, Arc<Window>)> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut this = Self {
            event_loop,
            pump: EventPump {
                config,
                window: None,
                events: Vec::new(),
                create_error: None,
            },
        };

        for _ in 0..MAX_STARTUP_PUMPS {
            let status = this
                .event_loop
                .pump_app_events(Some(Duration::from_millis(1)), &mut this.pump);

            if let Some(err) = this.pump.create_error.take() {
                return Err(err);
            }
            if let Some(window) = &this.pump.window {
                let window = Arc::clone(window);
                // Startup noise (initial resize, focus) is not interesting to callers.
                this.pump.events.clear();
                return Ok((this, window));
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited during startup (code {code})");
            }
        }

        anyhow::bail!("window was not created after {MAX_STARTUP_PUMPS} event pumps")
    }

    /// Processes pending events without blocking and returns them in arrival order.
    pub fn pump(&mut self) -> Vec<PlatformEvent> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.pump);

        if let PumpStatus::Exit(_) = status {
            self.pump.events.push(PlatformEvent::CloseRequested);
        }

        std::mem::take(&mut self.pump.events)
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.pump.window.as_ref()
    }

    /// Drops the window. Later pumps report nothing.
    pub fn close(&mut self) {
        self.pump.window = None;
        self.pump.events.clear();
    }
}

impl ApplicationHandler for EventPump {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.width.max(1)),
                f64::from(self.config.height.max(1)),
            ));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                log::debug!("window created: {:?}", window.inner_size());
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                self.create_error = Some(anyhow::Error::new(e).context("failed to create window"));
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = &self.window else { return };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((code, pressed)) = translate_key_event(&event) {
                    self.events.push(PlatformEvent::Key { code, pressed });
                }
            }
            WindowEvent::Focused(false) => self.events.push(PlatformEvent::FocusLost),
            WindowEvent::Resized(size) => self.events.push(PlatformEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = window.inner_size();
                self.events.push(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::CloseRequested => self.events.push(PlatformEvent::CloseRequested),
            _ => {}
        }
    }
}

//! Host-facing facades.
//!
//! Each facade maps one host class onto the render layer: primitive and slice
//! arguments in, primitive and `Vec` results out. They own their
//! [`RenderContext`] and every GPU object they create, and release all of it in
//! `delete`.
//!
//! Failure policy follows [`Strictness`]: permissive facades log and keep
//! going (a facade whose context failed to open turns every call into a no-op),
//! strict facades return the error.

mod mesh_renderer;
mod scene_renderer;

pub use mesh_renderer::MeshRenderer;
pub use scene_renderer::SceneRenderer;

use anyhow::Result;

use crate::logging::{init_logging, LoggingConfig};
use crate::render::{ContextConfig, RenderContext, Strictness};

/// Applies the failure policy to an operation's outcome.
fn settle(strictness: Strictness, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if strictness == Strictness::Strict => Err(e),
        Err(e) => {
            log::error!("{e:#}");
            Ok(())
        }
    }
}

/// Opens a context for a permissive facade, logging instead of failing.
fn open_context(title: &str, width: u32, height: u32) -> Option<RenderContext> {
    init_logging(LoggingConfig::default());
    match RenderContext::create(title, width, height) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            log::error!("renderer setup failed: {e:#}");
            None
        }
    }
}

fn try_open_context(config: ContextConfig) -> Result<RenderContext> {
    init_logging(LoggingConfig::default());
    RenderContext::with_config(config)
}

fn unusable() -> anyhow::Error {
    anyhow::anyhow!("renderer has no render context")
}

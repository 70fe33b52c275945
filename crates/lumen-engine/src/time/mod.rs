//! Time subsystem.
//!
//! Frame pacing without coupling to the window runtime:
//! - one `FrameLimiter` per render context
//! - call `tick(fps)` once per loop iteration to hold the loop at a target rate

mod frame_limiter;

pub use frame_limiter::{FrameLimiter, FrameTime};

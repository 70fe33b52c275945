//! Input subsystem.
//!
//! Keys are identified by host key codes ([`KeyCode`]), the numbering scripting
//! hosts already use for keyboards. Runtime code translates platform events into
//! [`PlatformEvent`](crate::backend::PlatformEvent)s; [`KeyboardState`] folds them
//! into the set of currently held keys.

mod keys;
mod state;

pub mod platform;

pub use keys::KeyCode;
pub use state::KeyboardState;

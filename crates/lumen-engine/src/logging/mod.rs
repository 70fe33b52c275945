//! Logger setup.
//!
//! Library code only uses the `log` facade. Binaries and the host facades call
//! [`init_logging`] to install `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};

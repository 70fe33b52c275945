use std::sync::Once;

use env_logger::{TimestampPrecision, WriteStyle};

/// Filter used when neither the config nor `RUST_LOG` provides one.
///
/// wgpu internals are chatty at info level.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// How the engine's logger is installed.
///
/// Filter precedence: `filter`, then `RUST_LOG`, then [`DEFAULT_FILTER`].
/// Filters use the `env_logger` syntax, e.g. `"warn,lumen_engine=debug"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: WriteStyle,
    /// `None` drops timestamps.
    pub timestamps: Option<TimestampPrecision>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: WriteStyle::Auto,
            timestamps: Some(TimestampPrecision::Millis),
        }
    }
}

impl LoggingConfig {
    fn resolved_filter(&self) -> String {
        self.filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger, once per process.
///
/// Later calls are ignored. A logger the host installed first is left alone.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter();

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp(config.timestamps)
            .try_init()
            .is_ok();

        if installed {
            log::debug!("logging initialized ({filter})");
        }
    });
}

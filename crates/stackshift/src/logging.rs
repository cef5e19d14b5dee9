//! Structured logging setup
//!
//! Logs go to stderr so stdout stays clean for JSON/Markdown output.
//! `RUST_LOG` overrides the default `warn` level.

use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Logging options taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConfig {
    /// Emit one JSON object per event
    pub use_json: bool,
    /// Plain text without ANSI escapes
    pub no_color: bool,
    /// Raise the default level to `debug`
    pub verbose: bool,
}

impl LoggingConfig {
    fn default_directive(&self) -> &'static str {
        if self.verbose {
            "stackshift=debug,stackshift_core=debug"
        } else {
            "warn"
        }
    }
}

/// Install the global subscriber (first call wins)
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

        let result = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(!config.no_color)
                        .with_target(false),
                )
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Failed to initialize logging: {}", e);
        }
    });
}

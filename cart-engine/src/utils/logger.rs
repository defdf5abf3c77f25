//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Console output, plain text or JSON
//! - Optional daily rotating file output (JSON)
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize console logging at the given level
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, false, None)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON console output (production) instead of plain text
/// * `log_dir` - Optional directory for daily rotating `cart-engine.*` files
///
/// Fails if a global subscriber is already installed.
pub fn init_logger_with_file(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if json_format {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_filter(build_filter(level))
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(false)
                .with_filter(build_filter(level))
                .boxed(),
        );
    }

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        fs::create_dir_all(log_dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "cart-engine");
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(true)
                .with_writer(appender)
                .with_filter(build_filter(level))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    tracing::debug!(level = %level, json = json_format, log_dir = ?log_dir, "Logger initialized");
    Ok(())
}

//!
//! src/logging.rs
//!
//! Initializes the tracing registry. Output goes to stderr so the
//! interactive prompts and the final summary keep stdout to themselves
//!
//!

use tracing_appender::non_blocking;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};

pub struct LoggingGuard(tracing_appender::non_blocking::WorkerGuard);

pub fn init_logging(
    cfg: &LoggingConfig,
    verbose: bool,
) -> Result<LoggingGuard, crate::errors::AlbumizerError> {
    let (writer, guard) = non_blocking(std::io::stderr());
    let directives = if verbose {
        "info,albumizer=debug".to_string()
    } else {
        cfg.filter_directives.clone()
    };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(directives));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(cfg.with_ansi)
        .with_target(cfg.include_target)
        .with_file(cfg.include_file_line)
        .with_line_number(cfg.include_file_line);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    match cfg.format {
        LogFormat::Json => {
            let time = tracing_subscriber::fmt::time::UtcTime::rfc_3339();
            registry
                .with(fmt_layer.with_timer(time).json().flatten_event(true))
                .init();
        }
        LogFormat::Pretty => {
            registry.with(fmt_layer.without_time()).init();
        }
    }

    Ok(LoggingGuard(guard))
}

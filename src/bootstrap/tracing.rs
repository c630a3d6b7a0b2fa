//! Tracing configuration
//!
//! ## Behavior / 行为
//!
//! - **Environment filter**: `RUST_LOG` wins, otherwise debug in dev builds
//!   and info in release builds
//! - **Format**: `2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message`
//! - **Outputs**: stdout plus a non-blocking file in the log directory; stdout
//!   only when the file writer cannot be created

use std::path::{Path, PathBuf};
use std::{fs, io, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};
use wf_core::config::AppConfig;

const LOG_FILE_NAME: &str = "watchface-transfer.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let app_level = if is_dev { "debug" } else { "info" };
    vec![
        "warn".to_string(),
        format!("watchface_transfer={app_level}"),
        format!("watchface_transfer_lib={app_level}"),
        format!("wf_core={app_level}"),
        format!("wf_app={app_level}"),
        format!("wf_infra={app_level}"),
        // Loopback traffic is chatty at debug.
        "wf_platform=info".to_string(),
    ]
}

/// Initialize the global tracing subscriber.
///
/// Call once, before the runtimes are wired.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(config: &AppConfig) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let stdout_writer: BoxMakeWriter = BoxMakeWriter::new(io::stdout);
    let file_writer = match resolve_log_dir(config).and_then(|dir| build_file_writer(&dir)) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {err}");
            None
        }
    };

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(stdout_layer);
    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn resolve_log_dir(config: &AppConfig) -> anyhow::Result<PathBuf> {
    match &config.storage.log_dir {
        Some(dir) => Ok(dir.clone()),
        None => wf_infra::fs::app_log_dir(),
    }
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

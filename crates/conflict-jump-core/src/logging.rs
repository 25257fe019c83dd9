use anyhow::Context;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the navigator log inside the log directory.
pub const LOG_FILE: &str = "conflict-jump.log";

const DEFAULT_DIRECTIVES: &str = "info";

/// Filter built from `RUST_LOG`, or `info` when it is unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber: plain-text events go to `<log_dir>/conflict-jump.log`,
/// formatted events to stderr (stdout carries command output).
///
/// Drop the returned guard only at exit; it flushes the file writer.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(log_dir, LOG_FILE));
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

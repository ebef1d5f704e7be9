// SPDX-License-Identifier: Apache-2.0

//! Logging setup for the worker binary (§4.5, §4.10).
//!
//! A base env-filtered, file-appended layer for the process's own
//! diagnostics, folded together with the per-job reload layers the
//! [`piper_adapters::LoggerReconfigurator`] hands back via `.with()`.

use std::path::Path;

use piper_adapters::logger::BoxedLayer;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path:?}: {source}")]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Installs the process-wide subscriber and returns the `tracing-appender`
/// guard the caller must keep alive for the life of the process.
pub fn install(
    process_log_path: &Path,
    reconfigurator_layers: Vec<BoxedLayer>,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LoggingError> {
    if let Some(parent) = process_log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file_name = process_log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("worker.log"));
    let parent = process_log_path.parent().unwrap_or_else(|| Path::new("."));
    let appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let base = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking));

    let subscriber = reconfigurator_layers
        .into_iter()
        .fold(Box::new(base) as Box<dyn tracing::Subscriber + Send + Sync>, |acc, layer| {
            Box::new(acc.with(layer))
        });
    tracing::subscriber::set_global_default(subscriber)
        .unwrap_or_else(|err| eprintln!("failed to install global tracing subscriber: {err}"));

    Ok(guard)
}

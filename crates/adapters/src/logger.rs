// SPDX-License-Identifier: Apache-2.0

//! Per-job logger redirection (§4.5).
//!
//! The original binding snapshots each Python `logging.Logger`'s handler
//! list and level once at executor start, then for every task detaches
//! those handlers and attaches two fresh `FileHandler`s — job stdout at the
//! snapshotted level, job stderr pinned to `ERROR` — restoring the snapshot
//! once the task finishes. `tracing` has no per-logger handler list; we get
//! the same effect with a pair of hot-swappable (`reload`) layers per named
//! logger, each gated to that logger's `target` by a level+target filter.
//! The snapshot taken at executor start is never retaken per task — see
//! [`LoggerReconfigurator::new`].

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::Metadata;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Filter, Layer};
use tracing_subscriber::reload;
use tracing_subscriber::registry::Registry;

/// A type-erased, hot-swappable tracing layer living in the global
/// subscriber built at bootstrap (§4.10).
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to open job log file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a named logger's handlers point while idle (no task running).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stdout,
    Stderr,
    Disabled,
}

#[derive(Clone)]
struct FileWriter(Arc<std::fs::File>);

impl std::io::Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        (&*self.0).write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        (&*self.0).flush()
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriter;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[derive(Clone)]
struct TargetLevelFilter {
    target: &'static str,
    max_level: tracing::level_filters::LevelFilter,
}

impl<S> Filter<S> for TargetLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &tracing_subscriber::layer::Context<'_, S>) -> bool {
        meta.target() == self.target && tracing::level_filters::LevelFilter::from(*meta.level()) <= self.max_level
    }
}

fn build_layer<W>(target: &'static str, level: tracing::level_filters::LevelFilter, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_filter(TargetLevelFilter {
            target,
            max_level: level,
        })
        .boxed()
}

fn open_append(path: &Path) -> Result<Arc<std::fs::File>, LoggerError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggerError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Arc::new(file))
}

/// One logger's out/err handler pair: the process logger, or one of the
/// configured storage loggers (§3 "Executor configuration").
struct LoggerChannel {
    target: &'static str,
    level: tracing::level_filters::LevelFilter,
    idle_destination: LogDestination,
    out_handle: reload::Handle<BoxedLayer, Registry>,
    err_handle: reload::Handle<BoxedLayer, Registry>,
}

impl LoggerChannel {
    fn idle_layer(target: &'static str, level: tracing::level_filters::LevelFilter, destination: &LogDestination) -> BoxedLayer {
        match destination {
            LogDestination::Stdout => build_layer(target, level, std::io::stdout),
            LogDestination::Stderr => build_layer(target, level, std::io::stderr),
            LogDestination::Disabled => build_layer(target, tracing::level_filters::LevelFilter::OFF, std::io::sink),
        }
    }

    fn point_at_job(&self, job_out: &Path, job_err: &Path) -> Result<(), LoggerError> {
        let out_file = FileWriter(open_append(job_out)?);
        let err_file = FileWriter(open_append(job_err)?);
        let out_layer = build_layer(self.target, self.level, out_file);
        let err_layer = build_layer(self.target, tracing::level_filters::LevelFilter::ERROR, err_file);
        let _ = self.out_handle.reload(out_layer);
        let _ = self.err_handle.reload(err_layer);
        Ok(())
    }

    fn restore_idle(&self) {
        let out_layer = Self::idle_layer(self.target, self.level, &self.idle_destination);
        let err_layer = build_layer(self.target, tracing::level_filters::LevelFilter::OFF, std::io::sink);
        let _ = self.out_handle.reload(out_layer);
        let _ = self.err_handle.reload(err_layer);
    }
}

/// Reconfigures one or more named loggers to job-scoped files for the
/// duration of a task, and restores their idle state afterward.
pub struct LoggerReconfigurator {
    channels: Vec<LoggerChannel>,
}

impl LoggerReconfigurator {
    /// Build the out/err reload layers for the process logger plus every
    /// configured storage logger, at the snapshotted level, idle against
    /// `idle_destination`. The returned [`BoxedLayer`] vec must be folded
    /// into the subscriber built once at bootstrap (§4.10) — this snapshot
    /// is taken exactly once, not re-taken per task (§4.5).
    pub fn new(
        process_target: &'static str,
        level: tracing::level_filters::LevelFilter,
        idle_destination: LogDestination,
        storage_targets: &[&'static str],
    ) -> (Self, Vec<BoxedLayer>) {
        let mut channels = Vec::new();
        let mut layers = Vec::new();

        for target in std::iter::once(process_target).chain(storage_targets.iter().copied()) {
            let (out_layer, out_handle) =
                reload::Layer::new(LoggerChannel::idle_layer(target, level, &idle_destination));
            let (err_layer, err_handle) = reload::Layer::new(build_layer(
                target,
                tracing::level_filters::LevelFilter::OFF,
                std::io::sink,
            ));
            layers.push(Box::new(out_layer) as BoxedLayer);
            layers.push(Box::new(err_layer) as BoxedLayer);
            channels.push(LoggerChannel {
                target,
                level,
                idle_destination: idle_destination.clone(),
                out_handle,
                err_handle,
            });
        }

        (Self { channels }, layers)
    }

    /// Detach the idle handlers and attach the per-job file handlers across
    /// every tracked logger (§4.5).
    pub fn reconfigure_for_job(&self, job_out: &Path, job_err: &Path) -> Result<(), LoggerError> {
        for channel in &self.channels {
            channel.point_at_job(job_out, job_err)?;
        }
        Ok(())
    }

    /// Detach the job file handlers and restore the snapshot taken at
    /// construction (§4.5).
    pub fn restore(&self) {
        for channel in &self.channels {
            channel.restore_idle();
        }
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;

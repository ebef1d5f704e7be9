// SPDX-License-Identifier: Apache-2.0

//! Worker bootstrap (C10, §4.10).
//!
//! Runs once per executor process, before the first command is read:
//! install the SIGTERM flag, repair the inherited logger if the fork
//! dropped its handlers, hand the process to the storage backend's
//! post-fork hook (best-effort), and start the streaming client if one is
//! configured.

use std::sync::Arc;

use piper_adapters::{LoggerReconfigurator, StreamTransport, StreamingClient};
use piper_core::ExecutorConfig;
use thiserror::Error;

use crate::signal::{SignalError, SigtermFlag};

/// The storage backend's post-fork hook, modeled as an external contract
/// (§4.10: "absence is logged at info level, not fatal") — mirrors the
/// shape of `piper_adapters::TaskDispatcher`: an opaque collaborator we
/// only call through, never implement.
pub trait StorageBootstrap: Send + Sync {
    /// Returns `true` if the hook exists and ran; `false` if the storage
    /// backend does not expose one at all (not an error).
    fn init_worker_post_fork(&self) -> Result<bool, String>;
}

/// A storage backend with no post-fork hook (the common case when no
/// persistent storage backend is configured).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStorageBootstrap;

impl StorageBootstrap for NoStorageBootstrap {
    fn init_worker_post_fork(&self) -> Result<bool, String> {
        Ok(false)
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to install SIGTERM handler")]
    Signal(#[source] SignalError),
}

/// Everything produced by a successful bootstrap that the executor loop
/// needs to carry forward.
pub struct BootstrapOutcome {
    pub sigterm: SigtermFlag,
    pub streaming: Option<StreamingClient>,
}

/// Run worker bootstrap (§4.10). `logger_needs_rebuild` reports whether the
/// inherited logger lost its handlers across a fork; when it has,
/// `reconfigurator` is asked to restore its idle state (the closest
/// `tracing`-native equivalent to "reload the logger + storage loggers").
pub fn bootstrap(
    config: &ExecutorConfig,
    logger_needs_rebuild: bool,
    reconfigurator: &LoggerReconfigurator,
    storage: &dyn StorageBootstrap,
    transport_factory: impl FnOnce(&str, u16) -> Arc<dyn StreamTransport>,
) -> Result<BootstrapOutcome, BootstrapError> {
    let sigterm = SigtermFlag::install().map_err(BootstrapError::Signal)?;

    if logger_needs_rebuild {
        tracing::warn!("inherited logger has no handlers, restoring idle configuration");
        reconfigurator.restore();
    }

    tracing::info!(worker_context = "WORKER", "entering worker context");

    match storage.init_worker_post_fork() {
        Ok(true) => tracing::debug!("storage post-fork hook ran"),
        Ok(false) => tracing::info!("storage backend exposes no post-fork hook"),
        Err(reason) => tracing::info!(%reason, "storage post-fork hook failed, continuing"),
    }

    let streaming = config.streaming.as_ref().map(|backend| {
        let transport = transport_factory(&backend.master_ip, backend.master_port);
        StreamingClient::start(backend.master_ip.clone(), backend.master_port, transport)
    });

    Ok(BootstrapOutcome { sigterm, streaming })
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;

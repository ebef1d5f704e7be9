// SPDX-License-Identifier: Apache-2.0

//! Executor configuration (§3): the read-only bundle handed to the executor
//! loop at construction time. Nothing in here is mutated once the loop
//! starts — per-task state (bound CPUs, job loggers) lives elsewhere and is
//! rebuilt every invocation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Streaming backend a worker may be wired to at bootstrap (§4.7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingBackend {
    pub name: String,
    pub master_ip: String,
    pub master_port: u16,
}

/// Read-only executor configuration (§3 "Executor configuration").
///
/// Constructed once at worker bootstrap from the supervisor's launch
/// arguments and never mutated afterward; the executor loop and its
/// collaborators only ever borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    pub debug: bool,
    pub tmp_dir: PathBuf,
    pub tracing_enabled: bool,
    pub storage_conf: Option<String>,
    pub logger_name: String,
    pub logger_config_path: Option<PathBuf>,
    pub persistent_storage: bool,
    pub storage_loggers: Vec<String>,
    pub streaming: Option<StreamingBackend>,
    pub profiler_enabled: bool,
}

impl ExecutorConfig {
    pub fn storage_conf_or_default(&self) -> &str {
        self.storage_conf.as_deref().unwrap_or("null")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// SPDX-License-Identifier: Apache-2.0

//! `execute_task` adapter — the native task-implementation registry (§4.8).
//!
//! This is an external contract, not something this workspace implements:
//! the real dispatcher resolves `module_name`/`method_name` against a
//! registry of task implementations, binds the parameter manifest, invokes
//! the user code (or spawns the binary/MPI/OmpSs/HTTP process behind it),
//! and reports back the exit-value/type/value deltas the executor needs to
//! build a reply. We model only the boundary: the request it receives and
//! the outcome it must produce.

use std::path::PathBuf;
use std::sync::Arc;

use piper_core::ExecuteTaskCommand;

use crate::cache::{CacheOpSender, CacheReader};

/// Everything the dispatcher needs that is not already carried on the
/// parsed [`ExecuteTaskCommand`] (§4.8 "Inputs").
#[derive(Clone)]
pub struct TaskDispatchRequest<'a> {
    pub command: &'a ExecuteTaskCommand,
    pub process_name: String,
    pub storage_conf: String,
    pub tracing_enabled: bool,
    pub logger_name: String,
    pub logger_config_path: Option<PathBuf>,
    pub out_path: PathBuf,
    pub err_path: PathBuf,
    pub profiler_enabled: bool,
    /// Read-only view of the worker's shared object cache (§5: shared
    /// read-only across executors).
    pub cache_reader: Arc<dyn CacheReader>,
    /// Write path for cache mutations, serialized by the cache tracker.
    pub cache_queue: Arc<dyn CacheOpSender>,
}

impl std::fmt::Debug for TaskDispatchRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDispatchRequest")
            .field("command", self.command)
            .field("process_name", &self.process_name)
            .field("storage_conf", &self.storage_conf)
            .field("tracing_enabled", &self.tracing_enabled)
            .field("logger_name", &self.logger_name)
            .field("logger_config_path", &self.logger_config_path)
            .field("out_path", &self.out_path)
            .field("err_path", &self.err_path)
            .field("profiler_enabled", &self.profiler_enabled)
            .finish_non_exhaustive()
    }
}

/// What the dispatcher reports back for a single task invocation (§4.8
/// "Outputs").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub exit_value: i32,
    /// `(new_type, new_value)` pairs for every parameter + self + returns
    /// whose value changed, in the order the reply encodes them.
    pub new_types: Vec<String>,
    pub new_values: Vec<String>,
    pub timed_out: bool,
    pub exception_message: Option<String>,
}

/// The external task-implementation registry, treated as an opaque
/// collaborator (Non-goal: "the native task implementation registry").
///
/// Implementations must never panic across this boundary: a crashing task
/// must surface as a non-zero `exit_value`, never as an unwind into the
/// executor loop, or a single bad task would poison the whole worker
/// process (§1 "strict failure isolation").
pub trait TaskDispatcher: Send + Sync {
    fn dispatch(&self, request: &TaskDispatchRequest<'_>) -> DispatchOutcome;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTaskDispatcher;

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

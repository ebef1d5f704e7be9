// SPDX-License-Identifier: Apache-2.0

//! The executor loop (C9, §4.9) — the worker's core state machine.
//!
//! `STARTING` is [`crate::bootstrap::bootstrap`]; everything below is the
//! `RUNNING ⇄ PROCESSING_TASK/PROCESSING_PING → QUIT → TEARDOWN` cycle. The
//! loop is single-threaded and synchronous by contract (§5): there is no
//! intra-executor parallelism, and a task's dispatch call is never
//! preempted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nix::sched::{sched_getaffinity, CpuSet};
use nix::unistd::Pid;
use piper_adapters::{
    CacheHandle, LoggerReconfigurator, ResourceBinder, TaskDispatchRequest, TaskDispatcher, TracingSink,
};
use piper_core::{
    classify_exit_value, parse_execute_task, render_reply, ExecuteTaskCommand, ExecutorConfig,
    TaskCommandError, TAG_EXECUTE_TASK, TAG_PING, TAG_PONG, TAG_QUIT,
};
use piper_adapters::tracing_sink::EventId;
use piper_adapters::{PipeChannel, PipeError};
use thiserror::Error;

use crate::env_vars::{clean_task_env, set_task_env};
use crate::exception_channel::ExceptionChannel;
use crate::signal::SigtermFlag;

/// Anything that forces the executor to fault mid-task: a malformed
/// command (§7.1) or a failure to write the one reply owed for it (I1).
#[derive(Debug, Error)]
pub enum TaskHandlingError {
    #[error("malformed EXECUTE_TASK command: {0}")]
    Parse(#[from] TaskCommandError),
    #[error("failed to write task reply: {0}")]
    Reply(#[from] PipeError),
}

/// How long [`PipeChannel::read_command`] sleeps before its single EOF
/// retry (§4.1).
const PIPE_RETRY_MS: u64 = 50;

/// Why the loop stopped running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorExit {
    /// `QUIT` was received: clean shutdown, proceed to TEARDOWN.
    Quit,
    /// A fatal protocol error or SIGTERM forced the loop to stop; the
    /// `"EXCEPTION"` sentinel has already been posted to the supervisor.
    Faulted,
}

/// Everything the loop needs for the lifetime of the executor process.
/// Built once at `STARTING`, borrowed for the rest of the process's life.
pub struct Executor {
    pipe: PipeChannel,
    config: ExecutorConfig,
    process_name: String,
    resource_binder: Arc<dyn ResourceBinder>,
    dispatcher: Arc<dyn TaskDispatcher>,
    tracing_sink: Arc<dyn TracingSink>,
    logger: LoggerReconfigurator,
    exception_channel: Arc<dyn ExceptionChannel>,
    sigterm: SigtermFlag,
    cache: CacheHandle,
}

impl Executor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pipe: PipeChannel,
        config: ExecutorConfig,
        process_name: String,
        resource_binder: Arc<dyn ResourceBinder>,
        dispatcher: Arc<dyn TaskDispatcher>,
        tracing_sink: Arc<dyn TracingSink>,
        logger: LoggerReconfigurator,
        exception_channel: Arc<dyn ExceptionChannel>,
        sigterm: SigtermFlag,
    ) -> Self {
        Self {
            pipe,
            config,
            process_name,
            resource_binder,
            dispatcher,
            tracing_sink,
            logger,
            exception_channel,
            sigterm,
            cache: CacheHandle::none(),
        }
    }

    /// Attach a shared object cache (§3, §5 "Shared resources"). Defaults
    /// to [`CacheHandle::none`] — most workers run with no shared cache.
    pub fn with_cache(mut self, cache: CacheHandle) -> Self {
        self.cache = cache;
        self
    }

    /// Drive the loop to completion (§4.9). Returns the reason it stopped;
    /// the caller (daemon `main`) maps this to a process exit code.
    pub fn run(&mut self) -> ExecutorExit {
        loop {
            if self.sigterm.take() {
                tracing::warn!("SIGTERM observed at a safe point, raising a domain exception");
                self.fault();
                return ExecutorExit::Faulted;
            }

            let line = match self.pipe.read_command(PIPE_RETRY_MS) {
                Ok(Some(line)) => line,
                Ok(None) => continue,
                Err(err) => {
                    tracing::error!(%err, "pipe read failed, exiting");
                    self.fault();
                    return ExecutorExit::Faulted;
                }
            };

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let Some(&tag) = tokens.first() else {
                tracing::error!("received an empty command line");
                self.fault();
                return ExecutorExit::Faulted;
            };

            match tag {
                TAG_EXECUTE_TASK => {
                    if let Err(err) = self.handle_execute_task(&tokens) {
                        tracing::error!(%err, "unrecoverable failure while processing a task");
                        self.fault();
                        return ExecutorExit::Faulted;
                    }
                }
                TAG_PING => {
                    if let Err(err) = self.pipe.write(TAG_PONG) {
                        tracing::error!(%err, "failed to reply to PING, exiting");
                        self.fault();
                        return ExecutorExit::Faulted;
                    }
                }
                TAG_QUIT => return ExecutorExit::Quit,
                other => {
                    tracing::error!(tag = other, "unexpected message");
                    self.fault();
                    return ExecutorExit::Faulted;
                }
            }
        }
    }

    fn fault(&self) {
        if let Err(err) = self.exception_channel.post_exception() {
            tracing::error!(%err, "failed to post exception to supervisor queue");
        }
    }

    /// Handle one `EXECUTE_TASK` command end to end (§4.9 transitions).
    ///
    /// A parse failure is a fatal protocol error (§7.1) and is propagated
    /// to the caller, which faults the executor. Everything past a
    /// successful parse is a per-task failure and is caught here so the
    /// loop survives (§7 "Propagation policy").
    fn handle_execute_task(&mut self, tokens: &[&str]) -> Result<(), TaskHandlingError> {
        let command = parse_execute_task(tokens)?;
        let _span = self.tracing_sink.enter_span(EventId::TaskExecution);

        self.resource_binder
            .bind(&command.cpu_mask, &command.gpu_mask);
        self.emit_affinity_point_events();

        let job_out = PathBuf::from(&command.job_out);
        let job_err = PathBuf::from(&command.job_err);
        if let Err(err) = self.logger.reconfigure_for_job(&job_out, &job_err) {
            tracing::warn!(%err, "failed to redirect loggers to job files, continuing with idle destination");
        }

        set_task_env(&command.hostnames, &command.compute_units);

        let outcome = self.dispatch(&command);
        let param_return_encoding = build_param_return_encoding(&outcome.new_types, &outcome.new_values);
        let task_outcome = classify_exit_value(outcome.exit_value, param_return_encoding, outcome.exception_message);
        let reply = render_reply(&command.job_id, &task_outcome);

        clean_task_env();
        self.resource_binder
            .clean_environment(&command.cpu_mask, &command.gpu_mask);
        self.logger.restore();

        self.pipe.write(&reply)?;
        Ok(())
    }

    fn dispatch(&self, command: &ExecuteTaskCommand) -> piper_adapters::DispatchOutcome {
        let request = TaskDispatchRequest {
            command,
            process_name: self.process_name.clone(),
            storage_conf: self.config.storage_conf_or_default().to_string(),
            tracing_enabled: command.tracing_enabled,
            logger_name: self.config.logger_name.clone(),
            logger_config_path: self.config.logger_config_path.clone(),
            out_path: PathBuf::from(&command.job_out),
            err_path: PathBuf::from(&command.job_err),
            profiler_enabled: self.config.profiler_enabled,
            cache_reader: Arc::clone(&self.cache.reader),
            cache_queue: Arc::clone(&self.cache.queue),
        };
        self.dispatcher.dispatch(&request)
    }

    /// Verify affinity and re-emit the observed CPU id + count as tracing
    /// point events (§4.9). Queried unconditionally, independent of whether
    /// this task asked for a binding — it reports whatever affinity the
    /// process actually has.
    fn emit_affinity_point_events(&self) {
        if !self.tracing_sink.enabled() {
            return;
        }
        let Ok(cpu_set) = sched_getaffinity(Pid::from_raw(0)) else {
            return;
        };
        let mut first_id: Option<i64> = None;
        let mut count: i64 = 0;
        for cpu in 0..CpuSet::CPU_SETSIZE {
            if cpu_set.is_set(cpu).unwrap_or(false) {
                count += 1;
                if first_id.is_none() {
                    first_id = Some(cpu as i64);
                }
            }
        }
        if let Some(id) = first_id {
            self.tracing_sink.point_event(EventId::CpuAffinity, id);
        }
        self.tracing_sink.point_event(EventId::CpuNumber, count);
    }

    /// Write the final `QUIT\n` reply and close the pipe (§2 control flow:
    /// "teardown streaming → write QUIT reply → exit"; S5). The caller is
    /// responsible for calling this only after `run()` has returned
    /// [`ExecutorExit::Quit`] and streaming teardown has happened.
    pub fn write_quit_reply(&mut self) -> Result<(), PipeError> {
        self.pipe.write(TAG_QUIT)?;
        self.pipe.close();
        Ok(())
    }

    pub fn input_path(&self) -> &Path {
        self.pipe.input_path()
    }

    pub fn output_path(&self) -> &Path {
        self.pipe.output_path()
    }
}

/// Flatten the dispatcher's `(new_type, new_value)` deltas into the reply's
/// param-return-encoding (§4.9: "the pair sequence `(new_type, new_value)`
/// for every parameter + self + returns").
fn build_param_return_encoding(new_types: &[String], new_values: &[String]) -> String {
    new_types
        .iter()
        .zip(new_values.iter())
        .map(|(t, v)| format!("{t} {v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

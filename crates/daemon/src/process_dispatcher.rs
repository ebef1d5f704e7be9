// SPDX-License-Identifier: Apache-2.0

//! Out-of-process task runner adapter.
//!
//! `execute_task` (C8) is specified as an opaque external collaborator
//! (§1 "the native task implementation registry"); this is the worker
//! binary's concrete wiring of that contract, not a reimplementation of the
//! registry itself. It shells out to a configured task-runner executable
//! and interprets its exit status and output the way the dispatcher
//! contract (§4.8) prescribes, the same blocking-subprocess shape
//! `containers-containrs` uses for its runtime-monitor handle.

use std::path::PathBuf;
use std::process::Command;

use piper_adapters::{DispatchOutcome, TaskDispatchRequest, TaskDispatcher};
use piper_core::{DOMAIN_EXCEPTION_EXIT_VALUE, SUCCESS_EXIT_VALUE};

/// Spawns `task_runner_path` once per task with the module/method and
/// flattened parameter quadruples as argv, and the per-task context as
/// environment variables.
pub struct ProcessTaskDispatcher {
    task_runner_path: PathBuf,
}

impl ProcessTaskDispatcher {
    pub fn new(task_runner_path: PathBuf) -> Self {
        Self { task_runner_path }
    }

    fn build_command(&self, request: &TaskDispatchRequest<'_>) -> Command {
        let command = request.command;
        let mut cmd = Command::new(&self.task_runner_path);
        cmd.arg(&command.operation_type)
            .arg(&command.module_name)
            .arg(&command.method_name);
        for param in &command.params {
            cmd.arg(&param.content_type)
                .arg(&param.stream)
                .arg(&param.prefix)
                .arg(&param.value);
        }
        cmd.env("PIPER_PROCESS_NAME", &request.process_name)
            .env("PIPER_STORAGE_CONF", &request.storage_conf)
            .env("PIPER_TRACING_ENABLED", request.tracing_enabled.to_string())
            .env("PIPER_LOGGER_NAME", &request.logger_name)
            .env("PIPER_JOB_OUT", &request.out_path)
            .env("PIPER_JOB_ERR", &request.err_path)
            .env("PIPER_PROFILER_ENABLED", request.profiler_enabled.to_string());
        cmd
    }
}

/// The runner's stdout, on success, is the space-separated
/// param-return-encoding (§4.9); on failure it is free-form and ignored in
/// favor of stderr as the exception message.
fn parse_outcome(exit_value: i32, stdout: &str, stderr: &str) -> DispatchOutcome {
    match exit_value {
        SUCCESS_EXIT_VALUE => {
            let tokens: Vec<String> = stdout.split_whitespace().map(str::to_string).collect();
            let (new_types, new_values) = tokens
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .unzip();
            DispatchOutcome {
                exit_value,
                new_types,
                new_values,
                timed_out: false,
                exception_message: None,
            }
        }
        DOMAIN_EXCEPTION_EXIT_VALUE => DispatchOutcome {
            exit_value,
            new_types: Vec::new(),
            new_values: Vec::new(),
            timed_out: false,
            exception_message: Some(stderr.trim().to_string()),
        },
        other => DispatchOutcome {
            exit_value: other,
            new_types: Vec::new(),
            new_values: Vec::new(),
            timed_out: false,
            exception_message: Some(stderr.trim().to_string()),
        },
    }
}

impl TaskDispatcher for ProcessTaskDispatcher {
    fn dispatch(&self, request: &TaskDispatchRequest<'_>) -> DispatchOutcome {
        let mut cmd = self.build_command(request);
        match cmd.output() {
            Ok(output) => {
                let exit_value = output.status.code().unwrap_or(-1);
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                parse_outcome(exit_value, &stdout, &stderr)
            }
            Err(err) => DispatchOutcome {
                exit_value: -1,
                new_types: Vec::new(),
                new_values: Vec::new(),
                timed_out: false,
                exception_message: Some(format!("failed to spawn task runner: {err}")),
            },
        }
    }
}

#[cfg(test)]
#[path = "process_dispatcher_tests.rs"]
mod tests;

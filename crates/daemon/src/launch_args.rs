// SPDX-License-Identifier: Apache-2.0

//! Launch argument parsing for the worker binary.
//!
//! The worker process is forked by the runtime's supervisor, not invoked by
//! a user from a shell (§1 "out of scope: the installer / CLI launchers"),
//! so this is a fixed positional argv, not a flag-based CLI surface.

use std::path::PathBuf;

use thiserror::Error;

pub const USAGE: &str = "piper-worker <process-name> <input-pipe> <output-pipe> <exception-queue> <config.json> <task-runner-binary>";

#[derive(Debug, Error)]
pub enum LaunchArgsError {
    #[error("wrong number of arguments: expected 6, got {0}\nusage: {USAGE}")]
    WrongArity(usize),
}

/// The worker process's positional launch arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchArgs {
    pub process_name: String,
    pub input_pipe: PathBuf,
    pub output_pipe: PathBuf,
    pub exception_queue: PathBuf,
    pub config_path: PathBuf,
    pub task_runner_path: PathBuf,
}

impl LaunchArgs {
    pub fn parse(args: &[String]) -> Result<Self, LaunchArgsError> {
        if args.len() != 6 {
            return Err(LaunchArgsError::WrongArity(args.len()));
        }
        Ok(Self {
            process_name: args[0].clone(),
            input_pipe: PathBuf::from(&args[1]),
            output_pipe: PathBuf::from(&args[2]),
            exception_queue: PathBuf::from(&args[3]),
            config_path: PathBuf::from(&args[4]),
            task_runner_path: PathBuf::from(&args[5]),
        })
    }
}

#[cfg(test)]
#[path = "launch_args_tests.rs"]
mod tests;

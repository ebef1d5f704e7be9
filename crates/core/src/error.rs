// SPDX-License-Identifier: Apache-2.0

//! Error types for the core data model.

use thiserror::Error;

use crate::task_command::TaskCommandError;

/// Errors surfaced while parsing or rendering wire-level protocol data.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed EXECUTE_TASK command: {0}")]
    TaskCommand(#[from] TaskCommandError),
    #[error("unknown parameter alias: {0}")]
    UnknownAlias(String),
    #[error("invalid content type tag: {0}")]
    InvalidContentType(String),
    #[error("invalid direction tag: {0}")]
    InvalidDirection(String),
    #[error("invalid stream binding tag: {0}")]
    InvalidStreamBinding(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

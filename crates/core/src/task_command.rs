// SPDX-License-Identifier: Apache-2.0

//! `EXECUTE_TASK` token-stream parsing and reply-line construction (§4.9,
//! §6).
//!
//! The wire protocol is whitespace-delimited ASCII text with a fixed,
//! positional token layout — there is no self-describing framing beyond
//! that. Parsing is therefore a single linear pass that consumes a known
//! number of tokens per field, with the hostname list and parameter list
//! being the only variable-length spans (each sized by a count token that
//! precedes it).

use thiserror::Error;

use crate::sentinel::{ABSENT_VALUE, TAG_COMPSS_EXCEPTION, TAG_END_TASK, TAG_EXECUTE_TASK};

/// One raw `(type, stream, prefix, value)` parameter token quadruple, as it
/// arrives on the wire. Higher layers (parameter.rs) turn this into a typed
/// [`crate::parameter::Parameter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamToken {
    pub content_type: String,
    pub stream: String,
    pub prefix: String,
    pub value: String,
}

/// A fully parsed `EXECUTE_TASK` command (§4.9 token layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteTaskCommand {
    pub job_id: String,
    pub job_out: String,
    pub job_err: String,
    pub tracing_enabled: bool,
    pub task_id: String,
    pub debug: bool,
    pub storage_conf: String,
    pub operation_type: String,
    pub module_name: String,
    pub method_name: String,
    pub timeout: String,
    pub hostnames: Vec<String>,
    pub compute_units: String,
    pub has_target: bool,
    pub param_count: usize,
    pub params: Vec<ParamToken>,
    pub cpu_mask: String,
    pub gpu_mask: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskCommandError {
    #[error("command has no tokens")]
    Empty,
    #[error("expected tag {TAG_EXECUTE_TASK:?}, got {0:?}")]
    WrongTag(String),
    #[error("truncated command: expected at least {expected} tokens, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("node count token {0:?} is not a valid integer")]
    BadNodeCount(String),
    #[error("parameter count token {0:?} is not a valid integer")]
    BadParamCount(String),
    #[error("has-return token must be the sentinel {ABSENT_VALUE:?}, got {0:?}")]
    UnexpectedReturnToken(String),
}

fn parse_bool_flag(token: &str) -> bool {
    token.eq_ignore_ascii_case("true")
}

/// Parse an `EXECUTE_TASK` token stream per the fixed positional layout.
///
/// `tokens` must already be split on whitespace and must include the
/// leading `EXECUTE_TASK` tag.
pub fn parse_execute_task(tokens: &[&str]) -> Result<ExecuteTaskCommand, TaskCommandError> {
    if tokens.is_empty() {
        return Err(TaskCommandError::Empty);
    }
    if tokens[0] != TAG_EXECUTE_TASK {
        return Err(TaskCommandError::WrongTag(tokens[0].to_string()));
    }

    // Fixed header: tag, job_id, job_out, job_err, tracing, task_id, debug,
    // storage_conf, operation_type, module, method, timeout, node_count.
    const HEADER_LEN: usize = 13;
    if tokens.len() < HEADER_LEN {
        return Err(TaskCommandError::Truncated {
            expected: HEADER_LEN,
            actual: tokens.len(),
        });
    }

    let job_id = tokens[1].to_string();
    let job_out = tokens[2].to_string();
    let job_err = tokens[3].to_string();
    let tracing_enabled = parse_bool_flag(tokens[4]);
    let task_id = tokens[5].to_string();
    let debug = parse_bool_flag(tokens[6]);
    let storage_conf = tokens[7].to_string();
    let operation_type = tokens[8].to_string();
    let module_name = tokens[9].to_string();
    let method_name = tokens[10].to_string();
    let timeout = tokens[11].to_string();
    let node_count: usize = tokens[12]
        .parse()
        .map_err(|_| TaskCommandError::BadNodeCount(tokens[12].to_string()))?;

    let hostnames_start = 13;
    let hostnames_end = hostnames_start + node_count;
    // Tail: compute_units, has_target, has_return, param_count, then P
    // quadruples, then cpu_mask, gpu_mask, reserved.
    let tail_fixed_len = 4;
    if tokens.len() < hostnames_end + tail_fixed_len {
        return Err(TaskCommandError::Truncated {
            expected: hostnames_end + tail_fixed_len,
            actual: tokens.len(),
        });
    }
    let hostnames: Vec<String> = tokens[hostnames_start..hostnames_end]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let compute_units = tokens[hostnames_end].to_string();
    let has_target = parse_bool_flag(tokens[hostnames_end + 1]);
    let has_return_token = tokens[hostnames_end + 2];
    if has_return_token != ABSENT_VALUE {
        return Err(TaskCommandError::UnexpectedReturnToken(
            has_return_token.to_string(),
        ));
    }
    let param_count_idx = hostnames_end + 3;
    let param_count: usize = tokens[param_count_idx]
        .parse()
        .map_err(|_| TaskCommandError::BadParamCount(tokens[param_count_idx].to_string()))?;

    let params_start = param_count_idx + 1;
    let params_end = params_start + param_count * 4;
    const TRAILER_LEN: usize = 3; // cpu mask, gpu mask, reserved slot.
    if tokens.len() < params_end + TRAILER_LEN {
        return Err(TaskCommandError::Truncated {
            expected: params_end + TRAILER_LEN,
            actual: tokens.len(),
        });
    }

    let mut params = Vec::with_capacity(param_count);
    for chunk in tokens[params_start..params_end].chunks_exact(4) {
        params.push(ParamToken {
            content_type: chunk[0].to_string(),
            stream: chunk[1].to_string(),
            prefix: chunk[2].to_string(),
            value: chunk[3].to_string(),
        });
    }

    let cpu_mask = tokens[params_end].to_string();
    let gpu_mask = tokens[params_end + 1].to_string();
    // tokens[params_end + 2] is the reserved slot; intentionally ignored.

    Ok(ExecuteTaskCommand {
        job_id,
        job_out,
        job_err,
        tracing_enabled,
        task_id,
        debug,
        storage_conf,
        operation_type,
        module_name,
        method_name,
        timeout,
        hostnames,
        compute_units,
        has_target,
        param_count,
        params,
        cpu_mask,
        gpu_mask,
    })
}

/// Outcome of dispatching a task, in the shape the reply builders expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Dispatcher exit value 0: task ran to completion.
    Success { param_return_encoding: String },
    /// Dispatcher exit value 2: a domain (`COMPSsException`) was raised.
    DomainException { message: String },
    /// Any other dispatcher exit value: an unexpected failure.
    OtherException { exit_value: i32 },
}

/// Domain exception exit code contract (§4.8, §6): non-zero/non-two means
/// unexpected failure, exactly 2 means a raised `COMPSsException`.
pub const DOMAIN_EXCEPTION_EXIT_VALUE: i32 = 2;
pub const SUCCESS_EXIT_VALUE: i32 = 0;

/// Classify a dispatcher exit value into the reply shape it must produce.
pub fn classify_exit_value(
    exit_value: i32,
    param_return_encoding: String,
    exception_message: Option<String>,
) -> TaskOutcome {
    match exit_value {
        SUCCESS_EXIT_VALUE => TaskOutcome::Success {
            param_return_encoding,
        },
        DOMAIN_EXCEPTION_EXIT_VALUE => TaskOutcome::DomainException {
            message: exception_message.unwrap_or_default(),
        },
        other => TaskOutcome::OtherException { exit_value: other },
    }
}

/// Render a reply line for a given job id and outcome (§6 reply shapes).
///
/// The line is newline-terminated; callers write it to the pipe verbatim.
pub fn render_reply(job_id: &str, outcome: &TaskOutcome) -> String {
    match outcome {
        TaskOutcome::Success {
            param_return_encoding,
        } => format!("{TAG_END_TASK} {job_id} {SUCCESS_EXIT_VALUE} {param_return_encoding}\n"),
        TaskOutcome::DomainException { message } => {
            let underscored = message.replace(' ', "_");
            format!("{TAG_COMPSS_EXCEPTION} {job_id} {underscored}\n")
        }
        TaskOutcome::OtherException { exit_value } => {
            format!("{TAG_END_TASK} {job_id} {exit_value}\n")
        }
    }
}

#[cfg(test)]
#[path = "task_command_tests.rs"]
mod tests;

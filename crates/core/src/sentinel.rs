// SPDX-License-Identifier: Apache-2.0

//! Wire sentinels shared by the pipe protocol (§6 of the protocol notes).
//!
//! These are the textual absent-value markers the native runtime and the
//! worker agree on. They are never derived from a type system on the wire
//! (everything is whitespace-delimited text), so they live as `&str`
//! constants rather than an enum.

/// "no binding" — unset CPU/GPU mask on an `EXECUTE_TASK` command.
pub const NO_BINDING: &str = "-";

/// "absent value" — used for parameter values and return slots that carry
/// no content.
pub const ABSENT_VALUE: &str = "null";

/// "absent parameter placeholder" — used inside core-element `impl_type_args`
/// for MPMD-MPI programs that omit `params`/`processes`.
pub const ABSENT_PARAM: &str = "#";

/// "absent extra content type" — module:class pair sentinel.
pub const UNDEFINED_CONTENT_TYPE: &str = "#UNDEFINED#:#UNDEFINED#";

/// Default parameter weight when the decorator does not specify one.
pub const DEFAULT_WEIGHT: &str = "1.0";

/// Command tag: request to run a task.
pub const TAG_EXECUTE_TASK: &str = "EXECUTE_TASK";
/// Reply tag: task finished (successfully or with a non-domain exception).
pub const TAG_END_TASK: &str = "endTask";
/// Reply tag: task finished with a domain (COMPSs) exception.
pub const TAG_COMPSS_EXCEPTION: &str = "compssExceptionTask";
/// Command tag: liveness probe.
pub const TAG_PING: &str = "PING";
/// Reply tag: liveness probe response.
pub const TAG_PONG: &str = "PONG";
/// Command tag: shut the executor down.
pub const TAG_QUIT: &str = "QUIT";

/// Out-of-band token posted to the supervisor queue on an unrecoverable
/// failure inside the executor loop.
pub const SUPERVISOR_EXCEPTION: &str = "EXCEPTION";

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;

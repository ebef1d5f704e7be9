// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! piper-core: wire protocol, parameter model, and core-element record
//! shared by the piper worker executor.

pub mod config;
pub mod core_element;
pub mod error;
pub mod parameter;
pub mod sentinel;
pub mod task_command;

pub use config::{ExecutorConfig, StreamingBackend};
pub use core_element::{CoreElement, CoreElementBuilder, ImplType, MpmdProgram, ProcessCount};
pub use error::CoreError;
pub use parameter::{
    infer_type, ContentType, Direction, ParamAlias, ParamOverrides, Parameter, RuntimeValue,
    StreamBinding,
};
pub use sentinel::{
    ABSENT_PARAM, ABSENT_VALUE, NO_BINDING, SUPERVISOR_EXCEPTION, TAG_COMPSS_EXCEPTION,
    TAG_END_TASK, TAG_EXECUTE_TASK, TAG_PING, TAG_PONG, TAG_QUIT, UNDEFINED_CONTENT_TYPE,
};
pub use task_command::{
    classify_exit_value, parse_execute_task, render_reply, ExecuteTaskCommand, ParamToken,
    TaskCommandError, TaskOutcome, DOMAIN_EXCEPTION_EXIT_VALUE, SUCCESS_EXIT_VALUE,
};

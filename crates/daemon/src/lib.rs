// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! piper-daemon: the worker binary's launch-argument parsing, logging
//! setup, and the concrete out-of-process task-dispatcher wiring.

pub mod launch_args;
pub mod logging;
pub mod process_dispatcher;

pub use launch_args::{LaunchArgs, LaunchArgsError};
pub use process_dispatcher::ProcessTaskDispatcher;

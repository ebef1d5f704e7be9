// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! piper-engine: worker bootstrap (§4.10) and the executor state machine
//! (§4.9) that drives it, built on top of piper-adapters' I/O collaborators
//! and piper-core's wire protocol and data model.

pub mod bootstrap;
pub mod env_vars;
pub mod exception_channel;
pub mod executor;
pub mod signal;

pub use bootstrap::{bootstrap, BootstrapError, BootstrapOutcome, NoStorageBootstrap, StorageBootstrap};
pub use exception_channel::{ExceptionChannel, ExceptionChannelError, FileExceptionChannel, MpscExceptionChannel};
pub use executor::{Executor, ExecutorExit, TaskHandlingError};
pub use signal::{SignalError, SigtermFlag};

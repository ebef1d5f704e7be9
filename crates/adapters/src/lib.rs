// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! piper-adapters: the I/O-facing collaborators the executor loop drives —
//! the pipe to the native runtime (§4.1), CPU/GPU binding (§4.4), per-job
//! logger redirection (§4.5), tracing emission (§4.6), the streaming client
//! (§4.7), and the external task-dispatch contract (§4.8).

pub mod cache;
pub mod dispatcher;
pub mod logger;
pub mod pipe;
pub mod resource_binder;
pub mod streaming;
pub mod tracing_sink;

pub use cache::{CacheHandle, CacheOp, CacheOpSender, CacheReader, NoCache};
pub use dispatcher::{DispatchOutcome, TaskDispatchRequest, TaskDispatcher};
pub use logger::{LogDestination, LoggerError, LoggerReconfigurator};
pub use pipe::{PipeChannel, PipeError};
pub use resource_binder::{BindError, NixResourceBinder, ResourceBinder, ResourceBinding};
pub use streaming::{StreamTransport, StreamingClient, StreamingError, TcpStreamTransport};
pub use tracing_sink::{EventId, EventsTracingSink, NoopTracingSink, TracingSink};

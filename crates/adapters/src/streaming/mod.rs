// SPDX-License-Identifier: Apache-2.0

//! Request/response client to a streaming daemon (§4.7).
//!
//! The wire framing to the streaming backend is opaque to the executor
//! (§6, "Streaming request/response framing"); we only need a transport
//! that can send a request and block for its response. Each high-level
//! stream kind (File/Object/PSCO) layers its own semantics on top of the
//! same [`StreamingClient`] handle.

mod file_stream;
mod object_stream;
mod psco_stream;
mod tcp_transport;

pub use file_stream::FileStream;
pub use object_stream::ObjectStream;
pub use psco_stream::{PscoStream, StorageApi};
pub use tcp_transport::TcpStreamTransport;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStorageApi, FakeStreamTransport};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the six request shapes the streaming backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    RegisterStream,
    Close,
    Status,
    BootstrapServer,
    Poll,
    Publish,
}

/// A request to the streaming backend; `payload` is an opaque, kind-specific
/// body (a topic name, a message, a stream id, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRequest {
    pub kind: RequestKind,
    pub stream_id: String,
    pub payload: String,
}

/// A response from the streaming backend. A non-zero `error_code` means
/// failure; `message` carries the kind-specific body on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamResponse {
    pub error_code: i32,
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum StreamingError {
    #[error("stream registration failed: {0}")]
    Registration(String),
    #[error("streaming backend failed: {0}")]
    Backend(String),
    #[error("streaming client is stopped")]
    Stopped,
}

/// Blocking wire transport to the streaming daemon. A single `send` call is
/// the "submit request, block on its completion latch" pair from §4.7 —
/// the latch is implicit in the synchronous call, since the executor that
/// drives it is itself a single-threaded blocking loop (§5).
pub trait StreamTransport: Send + Sync {
    fn send(&self, request: &StreamRequest) -> Result<StreamResponse, StreamingError>;
}

/// Singleton client handle started during executor bootstrap and stopped
/// during teardown (§4.7, §4.10).
pub struct StreamingClient {
    transport: Arc<dyn StreamTransport>,
    master_ip: String,
    master_port: u16,
    stopped: AtomicBool,
}

impl StreamingClient {
    pub fn start(master_ip: String, master_port: u16, transport: Arc<dyn StreamTransport>) -> Self {
        Self {
            transport,
            master_ip,
            master_port,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn master_ip(&self) -> &str {
        &self.master_ip
    }

    pub fn master_port(&self) -> u16 {
        self.master_port
    }

    /// Signal shutdown. Best-effort: in-flight requests already issued are
    /// not cancelled, but no new request is accepted afterward.
    pub fn set_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Submit a request and apply the per-kind error policy of §4.7:
    /// register failures raise, publish/poll failures raise, close/status
    /// failures are logged and swallowed (best effort).
    pub fn request(&self, request: StreamRequest) -> Result<StreamResponse, StreamingError> {
        if self.is_stopped() {
            return Err(StreamingError::Stopped);
        }
        let kind = request.kind;
        let response = self.transport.send(&request)?;
        if response.error_code == 0 {
            return Ok(response);
        }
        match kind {
            RequestKind::RegisterStream => Err(StreamingError::Registration(format!(
                "registration failed for stream {:?} (code {})",
                request.stream_id, response.error_code
            ))),
            RequestKind::Publish | RequestKind::Poll => Err(StreamingError::Backend(format!(
                "{:?} failed for stream {:?} (code {})",
                kind, request.stream_id, response.error_code
            ))),
            RequestKind::Close | RequestKind::Status => {
                tracing::warn!(
                    stream_id = %request.stream_id,
                    code = response.error_code,
                    ?kind,
                    "streaming request failed, continuing best-effort"
                );
                Ok(response)
            }
            RequestKind::BootstrapServer => Err(StreamingError::Backend(format!(
                "bootstrap_server failed (code {})",
                response.error_code
            ))),
        }
    }
}

/// Default poll timeout for object streams (§4.7).
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(200);

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

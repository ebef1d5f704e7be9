// SPDX-License-Identifier: Apache-2.0

//! Exception channel (C11, §4.11).
//!
//! A multi-producer queue shared with the worker supervisor. On any
//! uncaught exception during task processing the executor posts the
//! literal token `"EXCEPTION"` and returns, so the supervisor can account
//! for a lost executor and respawn it. The supervisor side of this queue
//! is not ours to implement (§4.11 names it an external collaborator); we
//! only need a producer.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use piper_core::SUPERVISOR_EXCEPTION;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExceptionChannelError {
    #[error("failed to post exception to supervisor queue at {path:?}: {source}")]
    Post {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A producer side of the supervisor's exception queue.
pub trait ExceptionChannel: Send + Sync {
    /// Post the `"EXCEPTION"` sentinel. Implementations should not panic —
    /// this is called from the failure path that is already unwinding the
    /// executor, and a second failure here must not mask the first.
    fn post_exception(&self) -> Result<(), ExceptionChannelError>;
}

/// Posts by appending the sentinel, newline-terminated, to a queue file the
/// supervisor tails — the same append-and-close discipline as the command
/// pipe (§4.1), since the supervisor is just another single-threaded reader.
pub struct FileExceptionChannel {
    queue_path: PathBuf,
}

impl FileExceptionChannel {
    pub fn new(queue_path: impl Into<PathBuf>) -> Self {
        Self {
            queue_path: queue_path.into(),
        }
    }

    pub fn queue_path(&self) -> &Path {
        &self.queue_path
    }
}

impl ExceptionChannel for FileExceptionChannel {
    fn post_exception(&self) -> Result<(), ExceptionChannelError> {
        use std::io::Write;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.queue_path)
            .map_err(|source| ExceptionChannelError::Post {
                path: self.queue_path.clone(),
                source,
            })?;
        writeln!(file, "{SUPERVISOR_EXCEPTION}").map_err(|source| ExceptionChannelError::Post {
            path: self.queue_path.clone(),
            source,
        })
    }
}

/// In-process producer for tests and for a daemon that keeps the supervisor
/// connection as a channel rather than a file.
pub struct MpscExceptionChannel {
    sender: Sender<&'static str>,
}

impl MpscExceptionChannel {
    pub fn new(sender: Sender<&'static str>) -> Self {
        Self { sender }
    }
}

impl ExceptionChannel for MpscExceptionChannel {
    fn post_exception(&self) -> Result<(), ExceptionChannelError> {
        // A disconnected receiver means the supervisor has already gone
        // away; there is nothing further this producer can do about it.
        let _ = self.sender.send(SUPERVISOR_EXCEPTION);
        Ok(())
    }
}

#[cfg(test)]
#[path = "exception_channel_tests.rs"]
mod tests;

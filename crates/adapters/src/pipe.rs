// SPDX-License-Identifier: Apache-2.0

//! Blocking, line-framed bidirectional IPC with the native runtime (§4.1).
//!
//! Two filesystem pipes per executor: one the runtime writes commands into,
//! one the executor writes replies into. The input handle is opened lazily
//! on first read, so the executor does not block on `open` until the
//! runtime side is actually ready to write.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipeError {
    #[error("failed to open pipe {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read from pipe {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write to pipe {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

enum Input {
    Closed,
    Open(BufReader<std::fs::File>),
}

/// A pair of named pipes: one inbound (commands from the runtime), one
/// outbound (replies to the runtime).
pub struct PipeChannel {
    input_path: PathBuf,
    output_path: PathBuf,
    input: Input,
}

impl PipeChannel {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            input: Input::Closed,
        }
    }

    fn ensure_input_open(&mut self) -> Result<(), PipeError> {
        if matches!(self.input, Input::Closed) {
            let file = OpenOptions::new()
                .read(true)
                .open(&self.input_path)
                .map_err(|source| PipeError::Open {
                    path: self.input_path.clone(),
                    source,
                })?;
            self.input = Input::Open(BufReader::new(file));
        }
        Ok(())
    }

    fn read_line_once(&mut self) -> Result<Option<String>, PipeError> {
        let reader = match &mut self.input {
            Input::Open(reader) => reader,
            Input::Closed => return Ok(None),
        };
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .map_err(|source| PipeError::Read {
                path: self.input_path.clone(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Return the next newline-terminated record, or `None` if no command
    /// has arrived yet.
    ///
    /// On EOF the call sleeps `retry_ms` and retries exactly once — the
    /// runtime's writer may close transiently at startup, but this is not a
    /// loop: a second EOF means "no command yet", not "retry forever".
    pub fn read_command(&mut self, retry_ms: u64) -> Result<Option<String>, PipeError> {
        self.ensure_input_open()?;
        if let Some(line) = self.read_line_once()? {
            return Ok(Some(line));
        }
        thread::sleep(Duration::from_millis(retry_ms));
        self.read_line_once()
    }

    /// Open the output pipe, append `msg` (normalized to end in exactly one
    /// newline), and close it. Each write is atomic at line granularity.
    pub fn write(&self, msg: &str) -> Result<(), PipeError> {
        let line = msg.strip_suffix('\n').unwrap_or(msg);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)
            .map_err(|source| PipeError::Open {
                path: self.output_path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|source| PipeError::Write {
                path: self.output_path.clone(),
                source,
            })
    }

    /// Close the input handle, if open. Idempotent.
    pub fn close(&mut self) {
        self.input = Input::Closed;
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[cfg(test)]
#[path = "pipe_tests.rs"]
mod tests;

// SPDX-License-Identifier: Apache-2.0

//! File stream: the server watches a base directory and reports new
//! filenames on poll; publishing is a no-op because the watched directory
//! is the publication mechanism (§4.7).

use super::{RequestKind, StreamRequest, StreamResponse, StreamingClient, StreamingError};

pub struct FileStream<'a> {
    client: &'a StreamingClient,
    stream_id: String,
}

impl<'a> FileStream<'a> {
    pub fn new(client: &'a StreamingClient, stream_id: impl Into<String>) -> Self {
        Self {
            client,
            stream_id: stream_id.into(),
        }
    }

    /// No-op: the backend discovers new files by watching its base
    /// directory, not by receiving a publish request.
    pub fn publish(&self, _value: &str) -> Result<(), StreamingError> {
        Ok(())
    }

    /// Newline-split filenames reported by the backend. A `null` or empty
    /// response is an empty list, not an error.
    pub fn poll(&self) -> Result<Vec<String>, StreamingError> {
        let response: StreamResponse = self.client.request(StreamRequest {
            kind: RequestKind::Poll,
            stream_id: self.stream_id.clone(),
            payload: String::new(),
        })?;
        Ok(split_filenames(response.message.as_deref()))
    }

    pub fn close(&self) -> Result<(), StreamingError> {
        self.client
            .request(StreamRequest {
                kind: RequestKind::Close,
                stream_id: self.stream_id.clone(),
                payload: String::new(),
            })
            .map(|_| ())
    }
}

fn split_filenames(message: Option<&str>) -> Vec<String> {
    match message {
        None => Vec::new(),
        Some(text) if text.is_empty() || text == "null" => Vec::new(),
        Some(text) => text.lines().map(str::to_string).collect(),
    }
}

#[cfg(test)]
#[path = "file_stream_tests.rs"]
mod tests;

// SPDX-License-Identifier: Apache-2.0

//! PSCO stream: publish persists the object (assigning a fresh id if it
//! was not already persistent) and registers the id server-side; poll
//! retrieves ids and rehydrates them through the storage API (§4.7).

use uuid::Uuid;

use super::{RequestKind, StreamRequest, StreamingClient, StreamingError};

/// The external persistent-object storage backend. Opaque collaborator,
/// mirroring the native task-dispatch contract (§4.8) but scoped to
/// persist/rehydrate for PSCO streaming.
pub trait StorageApi: Send + Sync {
    fn persist(&self, id: &str, value: &str) -> Result<(), String>;
    fn rehydrate(&self, id: &str) -> Result<String, String>;
}

pub struct PscoStream<'a, S: StorageApi> {
    client: &'a StreamingClient,
    stream_id: String,
    storage: &'a S,
}

impl<'a, S: StorageApi> PscoStream<'a, S> {
    pub fn new(client: &'a StreamingClient, stream_id: impl Into<String>, storage: &'a S) -> Self {
        Self {
            client,
            stream_id: stream_id.into(),
            storage,
        }
    }

    /// Persist `value` (assigning a random id if it has none yet) and
    /// register that id with the streaming backend.
    pub fn publish(&self, value: &str, existing_id: Option<&str>) -> Result<String, StreamingError> {
        let id = existing_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.storage
            .persist(&id, value)
            .map_err(StreamingError::Backend)?;
        self.client
            .request(StreamRequest {
                kind: RequestKind::RegisterStream,
                stream_id: self.stream_id.clone(),
                payload: id.clone(),
            })
            .map(|_| id)
    }

    /// Poll for newly published ids and rehydrate each one.
    pub fn poll(&self) -> Result<Vec<String>, StreamingError> {
        let response = self.client.request(StreamRequest {
            kind: RequestKind::Poll,
            stream_id: self.stream_id.clone(),
            payload: String::new(),
        })?;
        let ids = match response.message.as_deref() {
            None => Vec::new(),
            Some(text) if text.is_empty() || text == "null" => Vec::new(),
            Some(text) => text.lines().map(str::to_string).collect(),
        };
        ids.into_iter()
            .map(|id| self.storage.rehydrate(&id).map_err(StreamingError::Backend))
            .collect()
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

#[cfg(test)]
#[path = "psco_stream_tests.rs"]
mod tests;

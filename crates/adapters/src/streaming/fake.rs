// SPDX-License-Identifier: Apache-2.0

use parking_lot::Mutex;
use std::collections::HashMap;

use super::psco_stream::StorageApi;
use super::{RequestKind, StreamRequest, StreamResponse, StreamTransport, StreamingError};

/// Scripted transport: returns a fixed response per [`RequestKind`], and
/// records every request it was asked to send.
#[derive(Default)]
pub struct FakeStreamTransport {
    responses: Mutex<HashMap<RequestKind, StreamResponse>>,
    default_response: StreamResponse,
    sent: Mutex<Vec<StreamRequest>>,
}

impl FakeStreamTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            default_response: StreamResponse {
                error_code: 0,
                message: None,
            },
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_to(&self, kind: RequestKind, response: StreamResponse) {
        self.responses.lock().insert(kind, response);
    }

    pub fn sent_requests(&self) -> Vec<StreamRequest> {
        self.sent.lock().clone()
    }
}

impl StreamTransport for FakeStreamTransport {
    fn send(&self, request: &StreamRequest) -> Result<StreamResponse, StreamingError> {
        self.sent.lock().push(request.clone());
        Ok(self
            .responses
            .lock()
            .get(&request.kind)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

/// Test-only persistent-object store, standing in for the real storage API
/// PSCO publish/poll round-trips against.
#[derive(Default)]
pub struct FakeStorageApi {
    objects: Mutex<HashMap<String, String>>,
}

impl FakeStorageApi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageApi for FakeStorageApi {
    fn persist(&self, id: &str, value: &str) -> Result<(), String> {
        self.objects.lock().insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn rehydrate(&self, id: &str) -> Result<String, String> {
        self.objects
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| format!("no such persistent object: {id}"))
    }
}

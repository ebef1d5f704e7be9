// SPDX-License-Identifier: Apache-2.0

//! Object stream: publish/poll backed by a pub/sub pair that is created
//! lazily, on first use (§4.7).

use std::time::Duration;

use parking_lot::Mutex;

use super::{RequestKind, StreamRequest, StreamingClient, StreamingError, DEFAULT_POLL_TIMEOUT};

#[derive(Default)]
struct LazyEndpoints {
    publisher_ready: bool,
    consumer_ready: bool,
}

pub struct ObjectStream<'a> {
    client: &'a StreamingClient,
    stream_id: String,
    poll_timeout: Duration,
    endpoints: Mutex<LazyEndpoints>,
}

impl<'a> ObjectStream<'a> {
    pub fn new(client: &'a StreamingClient, stream_id: impl Into<String>) -> Self {
        Self {
            client,
            stream_id: stream_id.into(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            endpoints: Mutex::new(LazyEndpoints::default()),
        }
    }

    fn topic(&self) -> String {
        format!("regular-messages-{}", self.stream_id)
    }

    fn ensure_publisher(&self) -> Result<(), StreamingError> {
        let mut endpoints = self.endpoints.lock();
        if endpoints.publisher_ready {
            return Ok(());
        }
        self.client.request(StreamRequest {
            kind: RequestKind::BootstrapServer,
            stream_id: self.stream_id.clone(),
            payload: self.topic(),
        })?;
        self.client.request(StreamRequest {
            kind: RequestKind::RegisterStream,
            stream_id: self.stream_id.clone(),
            payload: self.topic(),
        })?;
        endpoints.publisher_ready = true;
        Ok(())
    }

    fn ensure_consumer(&self) -> Result<(), StreamingError> {
        let mut endpoints = self.endpoints.lock();
        if endpoints.consumer_ready {
            return Ok(());
        }
        self.client.request(StreamRequest {
            kind: RequestKind::RegisterStream,
            stream_id: self.stream_id.clone(),
            payload: self.topic(),
        })?;
        endpoints.consumer_ready = true;
        Ok(())
    }

    pub fn publish(&self, value: &str) -> Result<(), StreamingError> {
        self.ensure_publisher()?;
        self.client
            .request(StreamRequest {
                kind: RequestKind::Publish,
                stream_id: self.stream_id.clone(),
                payload: value.to_string(),
            })
            .map(|_| ())
    }

    /// Poll for the next published value, bounded by [`Self::poll_timeout`].
    pub fn poll(&self) -> Result<Option<String>, StreamingError> {
        self.ensure_consumer()?;
        let response = self.client.request(StreamRequest {
            kind: RequestKind::Poll,
            stream_id: self.stream_id.clone(),
            payload: self.poll_timeout.as_millis().to_string(),
        })?;
        Ok(response.message.filter(|m| !m.is_empty() && m != "null"))
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
#[path = "object_stream_tests.rs"]
mod tests;

// SPDX-License-Identifier: Apache-2.0

//! Real transport: one newline-delimited JSON request per TCP round trip,
//! the same line-framing discipline as the runtime pipe (§4.1) applied to
//! a second blocking channel.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Mutex;

use super::{StreamRequest, StreamResponse, StreamTransport, StreamingError};

pub struct TcpStreamTransport {
    conn: Mutex<BufReader<TcpStream>>,
}

impl TcpStreamTransport {
    pub fn connect(master_ip: &str, master_port: u16) -> std::io::Result<Self> {
        let stream = TcpStream::connect((master_ip, master_port))?;
        Ok(Self {
            conn: Mutex::new(BufReader::new(stream)),
        })
    }
}

impl StreamTransport for TcpStreamTransport {
    fn send(&self, request: &StreamRequest) -> Result<StreamResponse, StreamingError> {
        let line = serde_json::to_string(request)
            .map_err(|e| StreamingError::Backend(format!("failed to encode request: {e}")))?;

        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StreamingError::Backend("transport mutex poisoned".to_string()))?;

        let stream = conn.get_mut();
        stream
            .write_all(line.as_bytes())
            .and_then(|()| stream.write_all(b"\n"))
            .map_err(|e| StreamingError::Backend(format!("failed to send request: {e}")))?;

        let mut reply = String::new();
        conn.read_line(&mut reply)
            .map_err(|e| StreamingError::Backend(format!("failed to read response: {e}")))?;
        if reply.is_empty() {
            return Err(StreamingError::Backend(
                "streaming daemon closed the connection".to_string(),
            ));
        }

        serde_json::from_str(reply.trim_end())
            .map_err(|e| StreamingError::Backend(format!("failed to decode response: {e}")))
    }
}

#[cfg(test)]
#[path = "tcp_transport_tests.rs"]
mod tests;

use std::sync::Arc;

use super::super::fake::FakeStreamTransport;
use super::FileStream;
use crate::streaming::{RequestKind, StreamResponse, StreamingClient};

#[test]
fn poll_splits_newline_separated_filenames() {
    let transport = Arc::new(FakeStreamTransport::new());
    transport.respond_to(
        RequestKind::Poll,
        StreamResponse {
            error_code: 0,
            message: Some("a.txt\nb.txt".to_string()),
        },
    );
    let client = StreamingClient::start("127.0.0.1".to_string(), 9000, transport);
    let stream = FileStream::new(&client, "stream-1");

    assert_eq!(
        stream.poll().unwrap(),
        vec!["a.txt".to_string(), "b.txt".to_string()]
    );
}

#[test]
fn poll_with_null_message_is_empty() {
    let transport = Arc::new(FakeStreamTransport::new());
    transport.respond_to(
        RequestKind::Poll,
        StreamResponse {
            error_code: 0,
            message: Some("null".to_string()),
        },
    );
    let client = StreamingClient::start("127.0.0.1".to_string(), 9000, transport);
    let stream = FileStream::new(&client, "stream-1");

    assert!(stream.poll().unwrap().is_empty());
}

#[test]
fn publish_is_a_no_op() {
    let transport = Arc::new(FakeStreamTransport::new());
    let client = StreamingClient::start("127.0.0.1".to_string(), 9000, transport.clone());
    let stream = FileStream::new(&client, "stream-1");

    stream.publish("anything").unwrap();
    assert!(transport.sent_requests().is_empty());
}

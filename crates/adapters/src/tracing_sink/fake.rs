// SPDX-License-Identifier: Apache-2.0

use parking_lot::Mutex;

use super::{EventId, TracingSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TracingCall {
    Enter(EventId),
    Exit(EventId),
    Point(EventId, i64),
}

#[derive(Debug, Default)]
pub struct FakeTracingSink {
    calls: Mutex<Vec<TracingCall>>,
}

impl FakeTracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TracingCall> {
        self.calls.lock().clone()
    }
}

struct FakeSpanGuard<'a> {
    sink: &'a FakeTracingSink,
    event: EventId,
}

impl Drop for FakeSpanGuard<'_> {
    fn drop(&mut self) {
        self.sink.calls.lock().push(TracingCall::Exit(self.event));
    }
}

impl TracingSink for FakeTracingSink {
    fn enabled(&self) -> bool {
        true
    }

    fn enter_span(&self, event: EventId) -> Box<dyn Drop + '_> {
        self.calls.lock().push(TracingCall::Enter(event));
        Box::new(FakeSpanGuard { sink: self, event })
    }

    fn point_event(&self, event: EventId, value: i64) {
        self.calls.lock().push(TracingCall::Point(event, value));
    }
}

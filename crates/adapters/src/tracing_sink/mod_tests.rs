// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::tracing_sink::fake::{FakeTracingSink, TracingCall};

#[test]
fn event_ids_have_distinct_codes() {
    let all = [
        EventId::InsideWorker,
        EventId::CpuAffinity,
        EventId::GpuAffinity,
        EventId::CpuNumber,
        EventId::TaskExecution,
    ];
    for (i, a) in all.iter().enumerate() {
        for (j, b) in all.iter().enumerate() {
            if i != j {
                assert_ne!(a.as_code(), b.as_code());
            }
        }
    }
}

#[test]
fn span_guard_records_enter_then_exit_on_drop() {
    let sink = FakeTracingSink::new();
    {
        let _guard = sink.enter_span(EventId::CpuAffinity);
        assert_eq!(sink.calls(), vec![TracingCall::Enter(EventId::CpuAffinity)]);
    }
    assert_eq!(
        sink.calls(),
        vec![
            TracingCall::Enter(EventId::CpuAffinity),
            TracingCall::Exit(EventId::CpuAffinity),
        ]
    );
}

#[test]
fn point_event_is_recorded_with_value() {
    let sink = FakeTracingSink::new();
    sink.point_event(EventId::CpuNumber, 4);
    assert_eq!(sink.calls(), vec![TracingCall::Point(EventId::CpuNumber, 4)]);
}

// SPDX-License-Identifier: Apache-2.0

//! Tracing sink that forwards spans and point events onto the `tracing`
//! crate's dispatcher, the same ambient instrumentation layer the rest of
//! the worker logs through. There is no numeric-trace backend to talk to in
//! this workspace, so "emission" means a structured `tracing` event; an
//! operator wiring a real backend subscribes a `tracing_subscriber::Layer`
//! to pick these up.

use super::{EventId, TracingSink};

#[derive(Debug, Clone, Copy)]
pub struct EventsTracingSink {
    enabled: bool,
}

impl EventsTracingSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

struct SpanGuard(tracing::span::EnteredSpan);

impl Drop for SpanGuard {
    fn drop(&mut self) {}
}

impl TracingSink for EventsTracingSink {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn enter_span(&self, event: EventId) -> Box<dyn Drop + '_> {
        if !self.enabled {
            return Box::new(());
        }
        let span = tracing::span!(tracing::Level::TRACE, "piper.trace_event", code = event.as_code())
            .entered();
        Box::new(SpanGuard(span))
    }

    fn point_event(&self, event: EventId, value: i64) {
        if !self.enabled {
            return;
        }
        tracing::event!(
            tracing::Level::TRACE,
            code = event.as_code(),
            value,
            "piper.point_event"
        );
    }
}

#[cfg(test)]
#[path = "events_sink_tests.rs"]
mod tests;

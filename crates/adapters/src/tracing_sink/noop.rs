// SPDX-License-Identifier: Apache-2.0

//! Tracing sink used when the tracing flag is off, or when no backend is
//! configured at all.

use super::{EventId, TracingSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracingSink;

impl NoopTracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl TracingSink for NoopTracingSink {
    fn enabled(&self) -> bool {
        false
    }

    fn enter_span(&self, _event: EventId) -> Box<dyn Drop + '_> {
        Box::new(())
    }

    fn point_event(&self, _event: EventId, _value: i64) {}
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;

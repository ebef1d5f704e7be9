// SPDX-License-Identifier: Apache-2.0

//! Numeric tracing-event emission (§4.6).
//!
//! The native runtime's trace backend is an external collaborator we never
//! implement here (Non-goal: "we do not integrate a new tracing backend");
//! this module only gives the executor a safe, cheaply-disableable place to
//! call into it. Event ids are opaque to us — the runtime assigns their
//! numeric meaning.

mod events_sink;
mod noop;

pub use events_sink::EventsTracingSink;
pub use noop::NoopTracingSink;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTracingSink, TracingCall};

/// Constant event ids the executor emits against. The native runtime
/// assigns their numeric meaning; we only need stable, distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventId {
    InsideWorker,
    CpuAffinity,
    GpuAffinity,
    CpuNumber,
    TaskExecution,
}

impl EventId {
    /// Numeric tag sent to the backend, matching the variant ordering the
    /// native runtime expects for these four semantics (§4.6).
    pub fn as_code(self) -> u32 {
        match self {
            EventId::InsideWorker => 1,
            EventId::CpuAffinity => 2,
            EventId::GpuAffinity => 3,
            EventId::CpuNumber => 4,
            EventId::TaskExecution => 5,
        }
    }
}

/// A tracing sink's two primitives: scoped spans and point events.
///
/// Both must be safe to call with no real backend, and must be no-ops when
/// tracing is disabled (callers are expected to gate on
/// [`TracingSink::enabled`], but implementations must also tolerate being
/// called unconditionally).
pub trait TracingSink: Send + Sync {
    fn enabled(&self) -> bool;

    /// Enter a scoped span tagged with `event`. The returned guard exits the
    /// span on drop.
    fn enter_span(&self, event: EventId) -> Box<dyn Drop + '_>;

    /// Emit a single integer value under `event`.
    fn point_event(&self, event: EventId, value: i64);
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

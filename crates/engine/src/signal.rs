// SPDX-License-Identifier: Apache-2.0

//! SIGTERM discipline (§5 "Signal discipline", §4.10).
//!
//! The raw handler must not allocate or perform I/O beyond setting a flag;
//! `signal_hook::flag::register` gives us exactly that without writing any
//! unsafe code of our own. SIGTERM is converted into a raised exception at
//! the next safe point — the top of the executor loop checks the flag
//! before blocking on the next command read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to install SIGTERM handler: {0}")]
    Install(#[source] std::io::Error),
}

/// Shared flag a raw SIGTERM handler sets; the executor loop polls it at
/// safe points instead of handling the signal inline.
#[derive(Clone)]
pub struct SigtermFlag {
    received: Arc<AtomicBool>,
}

impl SigtermFlag {
    /// Register a SIGTERM handler that flips this flag. Safe to call once
    /// per process; registering twice layers a second handler harmlessly.
    pub fn install() -> Result<Self, SignalError> {
        let received = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&received))
            .map_err(SignalError::Install)?;
        Ok(Self { received })
    }

    /// Build a flag without installing a real OS handler — for tests that
    /// want to simulate a signal by calling [`Self::simulate`] directly.
    #[cfg(any(test, feature = "test-support"))]
    pub fn unarmed() -> Self {
        Self {
            received: Arc::new(AtomicBool::new(false)),
        }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn simulate(&self) {
        self.received.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.received.load(Ordering::SeqCst)
    }

    /// Read and clear the flag in one step, so a single delivery is
    /// observed exactly once.
    pub fn take(&self) -> bool {
        self.received.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;

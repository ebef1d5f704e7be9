// SPDX-License-Identifier: Apache-2.0

//! Test-only resource binder that records calls instead of touching real
//! process affinity or environment variables.

use parking_lot::Mutex;

use super::{BindError, ResourceBinder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceBinderCall {
    BindCpus(String),
    BindGpus(String),
    CleanEnvironment { cpus: String, gpus: String },
}

#[derive(Debug, Default)]
pub struct FakeResourceBinder {
    calls: Mutex<Vec<ResourceBinderCall>>,
    fail_cpu_bind: bool,
}

impl FakeResourceBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a binder whose `bind_cpus` always fails, to exercise the
    /// non-fatal failure path.
    pub fn failing_cpu_bind() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_cpu_bind: true,
        }
    }

    pub fn calls(&self) -> Vec<ResourceBinderCall> {
        self.calls.lock().clone()
    }
}

impl ResourceBinder for FakeResourceBinder {
    fn bind_cpus(&self, mask: &str) -> Result<(), BindError> {
        if self.fail_cpu_bind {
            return Err(BindError::Affinity {
                mask: mask.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        self.calls
            .lock()
            .push(ResourceBinderCall::BindCpus(mask.to_string()));
        Ok(())
    }

    fn bind_gpus(&self, mask: &str) {
        self.calls
            .lock()
            .push(ResourceBinderCall::BindGpus(mask.to_string()));
    }

    fn clean_environment(&self, cpus_mask: &str, gpus_mask: &str) {
        self.calls.lock().push(ResourceBinderCall::CleanEnvironment {
            cpus: cpus_mask.to_string(),
            gpus: gpus_mask.to_string(),
        });
    }
}

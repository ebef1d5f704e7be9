// SPDX-License-Identifier: Apache-2.0

//! Test-only dispatcher that returns a scripted outcome and records every
//! request it was asked to dispatch.

use parking_lot::Mutex;

use super::{DispatchOutcome, TaskDispatchRequest, TaskDispatcher};

pub struct FakeTaskDispatcher {
    outcome: DispatchOutcome,
    requests: Mutex<Vec<String>>,
}

impl FakeTaskDispatcher {
    pub fn new(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_tasks(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl TaskDispatcher for FakeTaskDispatcher {
    fn dispatch(&self, request: &TaskDispatchRequest<'_>) -> DispatchOutcome {
        self.requests.lock().push(format!(
            "{}.{}",
            request.command.module_name, request.command.method_name
        ));
        self.outcome.clone()
    }
}

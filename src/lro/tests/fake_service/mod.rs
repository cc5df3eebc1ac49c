// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An in-memory service with long-running operations.
//!
//! Each operation reports `IN_PROGRESS` for a configured number of status
//! requests, and then completes. The service returns JSON payloads, as a
//! remote service would.

use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Default)]
pub struct Outcome {
    pub failed: bool,
    pub retry_after_ms: Option<u64>,
}

#[derive(Debug)]
struct Operation {
    resource: String,
    remaining: u32,
    cancel_requested: bool,
    outcome: Outcome,
    /// Errors returned before the matching status requests.
    errors: VecDeque<String>,
    status_requests: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Service {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    operations: HashMap<String, Operation>,
}

impl Service {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an operation completing after `rounds` status requests.
    pub fn create_resource(&self, resource: &str, rounds: u32, outcome: Outcome) -> String {
        let mut state = self.state.lock().expect("shared state is poisoned");
        state.next_id += 1;
        let name = format!("operations/op-{:03}", state.next_id);
        state.operations.insert(
            name.clone(),
            Operation {
                resource: resource.to_string(),
                remaining: rounds,
                cancel_requested: false,
                outcome,
                errors: VecDeque::new(),
                status_requests: 0,
            },
        );
        name
    }

    /// Makes the next status requests for `name` fail.
    pub fn inject_errors<I>(&self, name: &str, errors: I)
    where
        I: IntoIterator<Item = &'static str>,
    {
        let mut state = self.state.lock().expect("shared state is poisoned");
        if let Some(op) = state.operations.get_mut(name) {
            op.errors.extend(errors.into_iter().map(str::to_string));
        }
    }

    pub fn get_operation(&self, name: &str) -> std::result::Result<Value, String> {
        let mut state = self.state.lock().expect("shared state is poisoned");
        let Some(op) = state.operations.get_mut(name) else {
            return Err(format!("operation {name} not found"));
        };
        op.status_requests += 1;
        if let Some(e) = op.errors.pop_front() {
            return Err(e);
        }
        if op.cancel_requested {
            return Ok(json!({"name": name, "status": "USER_CANCELLED"}));
        }
        if op.remaining > 0 {
            op.remaining -= 1;
            let mut body = json!({"name": name, "status": "IN_PROGRESS"});
            if let Some(ms) = op.outcome.retry_after_ms {
                body["retryAfterMs"] = json!(ms);
            }
            return Ok(body);
        }
        if op.outcome.failed {
            return Ok(json!({"name": name, "status": "FAILED"}));
        }
        Ok(json!({
            "name": name,
            "status": "SUCCESSFULLY_COMPLETED",
            "resource": {"name": op.resource},
        }))
    }

    pub fn cancel_operation(&self, name: &str) {
        let mut state = self.state.lock().expect("shared state is poisoned");
        if let Some(op) = state.operations.get_mut(name) {
            op.cancel_requested = true;
        }
    }

    pub fn status_requests(&self, name: &str) -> u32 {
        let state = self.state.lock().expect("shared state is poisoned");
        state
            .operations
            .get(name)
            .map(|op| op.status_requests)
            .unwrap_or_default()
    }

    pub fn cancel_requested(&self, name: &str) -> bool {
        let state = self.state.lock().expect("shared state is poisoned");
        state
            .operations
            .get(name)
            .is_some_and(|op| op.cancel_requested)
    }
}

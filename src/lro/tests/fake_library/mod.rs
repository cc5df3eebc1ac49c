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

//! A client library for the fake service, built on top of [lro::Poller].

use super::fake_service::{Outcome, Service};
use lro::polling_error_policy::PollingErrorPolicyArg;
use lro::{Error, OperationStatus, PollResponse, Poller, Result};
use std::time::Duration;

/// The property carrying the operation name between polls.
pub const OPERATION_NAME: &str = "operation-name";

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Resource {
    pub name: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationBody {
    name: String,
    status: OperationStatus,
    #[serde(default)]
    retry_after_ms: Option<u64>,
    #[serde(default)]
    resource: Option<Resource>,
}

pub struct Client {
    service: Service,
    poll_interval: Duration,
    policy: Option<PollingErrorPolicyArg>,
}

impl Client {
    pub fn new(service: Service, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
            policy: None,
        }
    }

    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.policy = Some(v.into());
        self
    }

    /// Starts creating a resource, returns a poller for the operation.
    pub fn create_resource(
        &self,
        resource: &str,
        rounds: u32,
        outcome: Outcome,
    ) -> Result<(String, Poller<Resource>)> {
        let name = self.service.create_resource(resource, rounds, outcome);

        let poll_service = self.service.clone();
        let initial_name = name.clone();
        let cancel_service = self.service.clone();
        let mut builder = Poller::builder()
            .with_poll_interval(self.poll_interval)
            .with_poll_operation(move |previous: PollResponse<Resource>| {
                let service = poll_service.clone();
                // Only the initial response lacks the operation name.
                let name = previous
                    .properties()
                    .and_then(|p| p.get(OPERATION_NAME))
                    .cloned()
                    .unwrap_or_else(|| initial_name.clone());
                async move { get_operation(&service, &name) }
            })
            .with_cancel_operation(move |poller: &Poller<Resource>| {
                let latest = poller.latest_response();
                if let Some(name) = latest.properties().and_then(|p| p.get(OPERATION_NAME)) {
                    cancel_service.cancel_operation(name);
                }
            });
        if let Some(policy) = &self.policy {
            builder = builder.with_polling_error_policy(policy.clone());
        }
        Ok((name, builder.build()?))
    }
}

fn get_operation(service: &Service, name: &str) -> Result<PollResponse<Resource>> {
    let body = service.get_operation(name).map_err(Error::transient)?;
    let body = serde_json::from_value::<OperationBody>(body).map_err(Error::other)?;
    let mut response = PollResponse::new(body.status, body.resource)
        .with_properties([(OPERATION_NAME, body.name)]);
    if let Some(ms) = body.retry_after_ms {
        response = response.with_retry_after(Duration::from_millis(ms));
    }
    Ok(response)
}

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

use crate::OperationStatus;
use std::collections::HashMap;
use std::time::Duration;

/// The result of one polling round of a long-running operation.
///
/// Poll operations return a new `PollResponse` on each round. The poller
/// passes the latest response to the next invocation of the poll operation,
/// so anything the poll operation needs to continue (continuation tokens,
/// status URLs) travels in [properties][PollResponse::properties].
///
/// Responses are immutable, the `with_*` functions consume the response and
/// return a new one.
///
/// # Example
/// ```
/// # use lro::{OperationStatus, PollResponse};
/// use std::time::Duration;
/// let response = PollResponse::new(OperationStatus::InProgress, Some(42))
///     .with_retry_after(Duration::from_millis(500));
/// assert!(!response.is_done());
/// assert_eq!(response.value(), Some(&42));
/// assert_eq!(response.retry_after(), Some(Duration::from_millis(500)));
/// ```
///
/// # Parameters
/// * `T` - the type of the payload reported by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct PollResponse<T> {
    status: OperationStatus,
    value: Option<T>,
    retry_after: Option<Duration>,
    properties: Option<HashMap<String, String>>,
}

impl<T> PollResponse<T> {
    /// Creates a new response with the given status and payload.
    pub fn new(status: OperationStatus, value: Option<T>) -> Self {
        Self {
            status,
            value,
            retry_after: None,
            properties: None,
        }
    }

    /// The response of an operation that has not started.
    ///
    /// Pollers start from this response.
    pub fn not_started() -> Self {
        Self::new(OperationStatus::NotStarted, None)
    }

    /// Overrides the poller interval before the next poll.
    pub fn with_retry_after(mut self, v: Duration) -> Self {
        self.retry_after = Some(v);
        self
    }

    /// Attaches properties for the next invocation of the poll operation.
    pub fn with_properties<I, K, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.properties = Some(v.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consumes the response and returns its payload.
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// The delay requested by the service before the next poll, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    pub fn properties(&self) -> Option<&HashMap<String, String>> {
        self.properties.as_ref()
    }

    /// Returns true if the operation reached a terminal status.
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OperationStatus::NotStarted, false)]
    #[test_case(OperationStatus::InProgress, false)]
    #[test_case(OperationStatus::SuccessfullyCompleted, true)]
    #[test_case(OperationStatus::Failed, true)]
    #[test_case(OperationStatus::UserCancelled, true)]
    #[test_case(OperationStatus::Other("QUEUED".into()), false)]
    fn is_done(status: OperationStatus, want: bool) {
        let response = PollResponse::<()>::new(status, None);
        assert_eq!(response.is_done(), want, "{response:?}");
    }

    #[test]
    fn not_started() {
        let response = PollResponse::<String>::not_started();
        assert_eq!(response.status(), &OperationStatus::NotStarted);
        assert_eq!(response.value(), None);
        assert_eq!(response.retry_after(), None);
        assert_eq!(response.properties(), None);
    }

    #[test]
    fn with_retry_after() {
        let response = PollResponse::new(OperationStatus::InProgress, Some("abc"))
            .with_retry_after(Duration::from_millis(50));
        assert_eq!(response.retry_after(), Some(Duration::from_millis(50)));
        assert_eq!(response.value(), Some(&"abc"));
        assert_eq!(response.into_value(), Some("abc"));
    }

    #[test]
    fn with_properties() {
        let response = PollResponse::<()>::new(OperationStatus::InProgress, None)
            .with_properties([("operation-location", "https://example.com/op/123")]);
        let got = response
            .properties()
            .and_then(|p| p.get("operation-location"))
            .map(String::as_str);
        assert_eq!(got, Some("https://example.com/op/123"));
    }

    #[test]
    fn with_functions_return_new_values() {
        let original = PollResponse::new(OperationStatus::InProgress, Some(1));
        let updated = original.clone().with_retry_after(Duration::from_secs(1));
        assert_eq!(original.retry_after(), None);
        assert_ne!(original, updated);
    }
}

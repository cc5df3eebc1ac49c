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

use crate::details::{BoxFuture, PollOperation, Shared};
use crate::poller::{CancelOperation, Poller};
use crate::{Error, PollResponse, Result};
use lro_core::polling_error_policy::{PollingErrorPolicyArg, StopOnError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The default number of responses buffered for each observer.
pub const DEFAULT_OBSERVER_CAPACITY: usize = 16;

/// Configures and creates a [Poller].
///
/// The poll interval and the poll operation are required. All other settings
/// have defaults.
///
/// # Example
/// ```
/// # use lro::{OperationStatus, PollResponse, Poller};
/// # use lro::polling_error_policy::{ContinueOnTransient, PollingErrorPolicyExt};
/// # use std::time::Duration;
/// # tokio_test::block_on(async {
/// let poller = Poller::builder()
///     .with_poll_interval(Duration::from_millis(100))
///     .with_poll_operation(|_previous| async {
///         Ok(PollResponse::new(OperationStatus::SuccessfullyCompleted, Some(42)))
///     })
///     .with_polling_error_policy(ContinueOnTransient.with_attempt_limit(10))
///     .build()?;
/// let response = poller.until_done().await?;
/// assert_eq!(response.value(), Some(&42));
/// # Ok::<(), lro::Error>(()) });
/// ```
pub struct PollerBuilder<T> {
    poll_interval: Option<Duration>,
    poll_operation: Option<PollOperation<T>>,
    cancel_operation: Option<CancelOperation<T>>,
    error_policy: PollingErrorPolicyArg,
    observer_capacity: usize,
    runtime: Option<tokio::runtime::Handle>,
}

impl<T> PollerBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            poll_interval: None,
            poll_operation: None,
            cancel_operation: None,
            error_policy: PollingErrorPolicyArg::from(StopOnError),
            observer_capacity: DEFAULT_OBSERVER_CAPACITY,
            runtime: None,
        }
    }

    /// Sets the delay between polls.
    ///
    /// Responses with a [retry_after][PollResponse::retry_after] value
    /// override this delay for the next poll. Must be strictly positive.
    pub fn with_poll_interval(mut self, v: Duration) -> Self {
        self.poll_interval = Some(v);
        self
    }

    /// Sets the poll operation.
    ///
    /// The poller calls this function with the latest response, and records
    /// the response it returns. Any state needed to query the operation can be
    /// captured by the closure or carried in the response
    /// [properties][PollResponse::properties].
    pub fn with_poll_operation<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(PollResponse<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PollResponse<T>>> + Send + 'static,
    {
        let operation: PollOperation<T> =
            Arc::new(move |r| -> BoxFuture<Result<PollResponse<T>>> { Box::pin(f(r)) });
        self.poll_operation = Some(operation);
        self
    }

    /// Sets the cancel operation.
    ///
    /// The poller calls this function from [Poller::cancel_operation], and only
    /// while the operation is in progress. The function typically sends a
    /// cancellation request to the service; the next poll then reports the
    /// operation as cancelled.
    pub fn with_cancel_operation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Poller<T>) + Send + Sync + 'static,
    {
        self.cancel_operation = Some(Arc::new(f));
        self
    }

    /// Sets the policy applied when an automatic poll fails.
    ///
    /// The default, [StopOnError], finishes the poller on the first failure.
    pub fn with_polling_error_policy<V: Into<PollingErrorPolicyArg>>(mut self, v: V) -> Self {
        self.error_policy = v.into();
        self
    }

    /// Sets the number of responses buffered for each observer.
    ///
    /// Observers that fall further behind skip responses. Must be greater than
    /// zero.
    pub fn with_observer_capacity(mut self, v: usize) -> Self {
        self.observer_capacity = v;
        self
    }

    /// Sets the runtime used to run the polling loop.
    ///
    /// By default the poller uses the runtime it is built in.
    pub fn with_runtime(mut self, v: tokio::runtime::Handle) -> Self {
        self.runtime = Some(v);
        self
    }

    /// Creates the poller and starts polling.
    pub fn build(self) -> Result<Poller<T>> {
        let poll_interval = self
            .poll_interval
            .ok_or_else(|| Error::missing_argument("poll_interval"))?;
        if poll_interval.is_zero() {
            return Err(Error::invalid_argument(
                "the poll interval must be greater than zero",
            ));
        }
        let poll_operation = self
            .poll_operation
            .ok_or_else(|| Error::missing_argument("poll_operation"))?;
        if self.observer_capacity == 0 {
            return Err(Error::invalid_argument(
                "the observer capacity must be greater than zero",
            ));
        }
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => tokio::runtime::Handle::try_current().map_err(Error::runtime)?,
        };
        let shared = Shared::new(
            poll_interval,
            poll_operation,
            self.error_policy.0,
            self.observer_capacity,
        );
        Ok(Poller::start(shared, self.cancel_operation, runtime))
    }
}

impl<T> std::default::Default for PollerBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for PollerBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollerBuilder")
            .field("poll_interval", &self.poll_interval)
            .field("poll_operation", &self.poll_operation.is_some())
            .field("cancel_operation", &self.cancel_operation.is_some())
            .field("error_policy", &self.error_policy)
            .field("observer_capacity", &self.observer_capacity)
            .finish()
    }
}

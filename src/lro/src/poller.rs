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

use crate::builder::PollerBuilder;
use crate::details::{Shared, polling_loop};
use crate::observer::Observer;
use crate::{Error, OperationStatus, PollResponse, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub(crate) type CancelOperation<T> = Arc<dyn Fn(&Poller<T>) + Send + Sync>;

/// Polls a long-running operation until it completes.
///
/// A poller invokes the poll operation on a schedule, starting as soon as the
/// poller is created. Each invocation receives the latest response, and
/// returns the next one. The delay between polls is the poll interval, unless
/// the latest response carries a [retry_after][PollResponse::retry_after]
/// value. Polling stops once a response reaches a terminal status.
///
/// Applications can wait for the operation to complete
/// ([until_done][Poller::until_done]), watch its progress
/// ([observer][Poller::observer]), poll on demand ([poll][Poller::poll]),
/// pause automatic polling, and request cancellation.
///
/// Dropping the poller stops the automatic polling. It does not cancel the
/// operation in the service.
///
/// # Example
/// ```
/// # use lro::{OperationStatus, PollResponse, Poller};
/// # use std::sync::Arc;
/// # use std::sync::atomic::{AtomicU32, Ordering};
/// # use std::time::Duration;
/// # tokio_test::block_on(async {
/// let rounds = Arc::new(AtomicU32::new(0));
/// let poller = Poller::new(Duration::from_millis(10), move |_previous| {
///     let round = rounds.fetch_add(1, Ordering::SeqCst);
///     async move {
///         let status = if round < 2 {
///             OperationStatus::InProgress
///         } else {
///             OperationStatus::SuccessfullyCompleted
///         };
///         Ok(PollResponse::new(status, Some(round)))
///     }
/// })?;
/// let response = poller.until_done().await?;
/// assert_eq!(response.status(), &OperationStatus::SuccessfullyCompleted);
/// # Ok::<(), lro::Error>(()) });
/// ```
///
/// # Parameters
/// * `T` - the type of the payload reported by the poll operation.
pub struct Poller<T> {
    shared: Arc<Shared<T>>,
    cancel_operation: Option<CancelOperation<T>>,
    /// Pauses and resumes the polling loop.
    auto_polling: watch::Sender<bool>,
    /// Stops the polling loop task.
    shutdown: CancellationToken,
}

impl<T> Poller<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a poller and starts polling.
    ///
    /// Fails if `poll_interval` is zero, or if called outside a tokio runtime.
    pub fn new<F, Fut>(poll_interval: Duration, poll_operation: F) -> Result<Self>
    where
        F: Fn(PollResponse<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PollResponse<T>>> + Send + 'static,
    {
        Self::builder()
            .with_poll_interval(poll_interval)
            .with_poll_operation(poll_operation)
            .build()
    }

    /// Creates a poller that supports [cancel_operation][Poller::cancel_operation].
    pub fn with_cancel<F, Fut, C>(
        poll_interval: Duration,
        poll_operation: F,
        cancel_operation: C,
    ) -> Result<Self>
    where
        F: Fn(PollResponse<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PollResponse<T>>> + Send + 'static,
        C: Fn(&Poller<T>) + Send + Sync + 'static,
    {
        Self::builder()
            .with_poll_interval(poll_interval)
            .with_poll_operation(poll_operation)
            .with_cancel_operation(cancel_operation)
            .build()
    }

    /// Returns a builder to configure all the poller settings.
    pub fn builder() -> PollerBuilder<T> {
        PollerBuilder::new()
    }

    pub(crate) fn start(
        shared: Shared<T>,
        cancel_operation: Option<CancelOperation<T>>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let shared = Arc::new(shared);
        let (auto_polling, enabled) = watch::channel(true);
        let shutdown = CancellationToken::new();
        let _handle = runtime.spawn(polling_loop(shared.clone(), enabled, shutdown.clone()));
        Self {
            shared,
            cancel_operation,
            auto_polling,
            shutdown,
        }
    }

    /// Polls the operation once.
    ///
    /// The poll operation receives the latest response. On success, the new
    /// response becomes the latest response, and observers receive it. On
    /// failure, the error is returned to this caller only.
    ///
    /// This runs independently of automatic polling, and may race with it.
    /// The most recent result wins, except that once a terminal response is
    /// recorded it is never replaced.
    pub async fn poll(&self) -> Result<PollResponse<T>> {
        let response = self.shared.poll_once().await?;
        self.shared.record(response.clone());
        Ok(response)
    }

    /// Waits until the operation completes.
    ///
    /// Returns the terminal response, or the error that stopped the automatic
    /// polling. If automatic polling is disabled and never re-enabled this
    /// function only returns if manual polls complete the operation.
    pub async fn until_done(&self) -> Result<PollResponse<T>> {
        self.shared.until_done().await
    }

    /// Waits until the operation reaches `status`, or completes.
    pub async fn until_status(&self, status: &OperationStatus) -> Result<PollResponse<T>> {
        self.shared.until_status(status).await
    }

    /// Like [until_done][Poller::until_done], giving up after `timeout`.
    ///
    /// On timeout, the poller continues polling.
    pub async fn until_done_timeout(&self, timeout: Duration) -> Result<PollResponse<T>> {
        tokio::time::timeout(timeout, self.shared.until_done())
            .await
            .map_err(Error::timeout)?
    }

    /// Requests the cancellation of the operation.
    ///
    /// Invokes the cancel operation if the operation is in progress, and does
    /// nothing otherwise. Polling continues: the service reports the
    /// cancellation in a later response.
    ///
    /// Fails if the poller was created without a cancel operation.
    pub fn cancel_operation(&self) -> Result<()> {
        let Some(cancel) = &self.cancel_operation else {
            return Err(Error::unsupported(
                "the poller was created without a cancel operation",
            ));
        };
        let status = self.status();
        if status != OperationStatus::InProgress {
            tracing::debug!("ignoring cancel request, operation status is {status}");
            return Ok(());
        }
        cancel(self);
        Ok(())
    }

    /// Enables or disables automatic polling.
    ///
    /// Disabling automatic polling pauses the polling loop. A poll already in
    /// flight is not interrupted, and its result is recorded. Enabling it
    /// again resumes polling from the latest response, after a full delay.
    /// Automatic polls never overlap, and the attempt count and elapsed time
    /// seen by the polling error policy carry over across pauses.
    ///
    /// Enabling automatic polling after the operation completed has no
    /// effect.
    pub fn set_auto_polling_enabled(&self, enabled: bool) {
        let changed = self.auto_polling.send_if_modified(|current| {
            if *current == enabled {
                return false;
            }
            *current = enabled;
            true
        });
        if changed && enabled && self.shared.is_finished() {
            tracing::debug!("auto-polling enabled after the operation finished, nothing to do");
        }
    }

    /// Returns true if automatic polling is enabled.
    pub fn is_auto_polling_enabled(&self) -> bool {
        *self.auto_polling.borrow()
    }

    /// Returns a new observer for the poller responses.
    ///
    /// Observers do not trigger additional polls.
    pub fn observer(&self) -> Observer<T> {
        self.shared.observer()
    }

    /// The status of the latest response.
    pub fn status(&self) -> OperationStatus {
        self.shared.latest().status().clone()
    }

    /// Returns a copy of the latest response.
    pub fn latest_response(&self) -> PollResponse<T> {
        self.shared.latest()
    }

    /// The delay between polls, unless a response overrides it.
    pub fn poll_interval(&self) -> Duration {
        self.shared.poll_interval()
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<T> std::fmt::Debug for Poller<T>
where
    T: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("poll_interval", &self.poll_interval())
            .field("latest_response", &self.latest_response())
            .field("cancel_operation", &self.cancel_operation.is_some())
            .field("auto_polling", &self.is_auto_polling_enabled())
            .finish()
    }
}

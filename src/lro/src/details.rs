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

//! Simplifies the implementation of `Poller`.
//!
//! The state shared between the poller, its background polling loop, and its
//! observers lives here, together with the polling loop itself.

use crate::observer::Observer;
use crate::{Error, PollResponse, Result};
use lro_core::loop_state::LoopState;
use lro_core::polling_error_policy::PollingErrorPolicy;
use lro_core::polling_state::PollingState;
use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
pub(crate) type PollOperation<T> =
    Arc<dyn Fn(PollResponse<T>) -> BoxFuture<Result<PollResponse<T>>> + Send + Sync>;

/// The state shared by a poller and its polling loop.
pub(crate) struct Shared<T> {
    poll_interval: Duration,
    poll_operation: PollOperation<T>,
    error_policy: Arc<dyn PollingErrorPolicy>,
    state: watch::Sender<State<T>>,
}

/// The latest observation of the operation.
///
/// Updates to the response and the broadcast to observers happen under the
/// same lock, a new observer never misses nor duplicates a response.
pub(crate) struct State<T> {
    response: PollResponse<T>,
    /// Set once the poller finishes, with the terminal response or the error
    /// that stopped the polling loop.
    outcome: Option<Result<PollResponse<T>>>,
    /// Dropped when the poller finishes, which ends all observers.
    events: Option<broadcast::Sender<Result<PollResponse<T>>>>,
}

impl<T> State<T>
where
    T: Clone,
{
    fn publish(&self, item: Result<PollResponse<T>>) {
        if let Some(tx) = &self.events {
            // Fails only if there are no observers.
            let _ = tx.send(item);
        }
    }

    fn finish(&mut self, outcome: Result<PollResponse<T>>) {
        self.outcome = Some(outcome);
        self.events = None;
    }
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        poll_interval: Duration,
        poll_operation: PollOperation<T>,
        error_policy: Arc<dyn PollingErrorPolicy>,
        observer_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(observer_capacity);
        let (state, _) = watch::channel(State {
            response: PollResponse::not_started(),
            outcome: None,
            events: Some(events),
        });
        Self {
            poll_interval,
            poll_operation,
            error_policy,
            state,
        }
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn latest(&self) -> PollResponse<T> {
        self.state.borrow().response.clone()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.state.borrow().outcome.is_some()
    }

    /// Runs the poll operation once, against the latest response.
    pub(crate) fn poll_once(&self) -> BoxFuture<Result<PollResponse<T>>> {
        (self.poll_operation)(self.latest())
    }

    /// The delay before the next automatic poll.
    pub(crate) fn next_delay(&self) -> Duration {
        self.state
            .borrow()
            .response
            .retry_after()
            .unwrap_or(self.poll_interval)
    }

    /// Records a new response and notifies the observers.
    ///
    /// Returns true if the poller is finished. Responses received after the
    /// poller finished are dropped.
    pub(crate) fn record(&self, response: PollResponse<T>) -> bool {
        let mut finished = true;
        self.state.send_if_modified(|state| {
            if state.outcome.is_some() {
                tracing::debug!(
                    "dropping {} response, the operation already finished",
                    response.status()
                );
                return false;
            }
            state.response = response.clone();
            state.publish(Ok(response.clone()));
            finished = response.is_done();
            if finished {
                state.finish(Ok(response));
            }
            true
        });
        finished
    }

    /// Notifies the observers about an error, without stopping the poller.
    pub(crate) fn publish_error(&self, error: Error) {
        self.state.send_if_modified(|state| {
            state.publish(Err(error));
            false
        });
    }

    /// Finishes the poller with an error.
    pub(crate) fn terminate(&self, error: Error) {
        self.state.send_if_modified(|state| {
            if state.outcome.is_some() {
                return false;
            }
            state.publish(Err(error.clone()));
            state.finish(Err(error));
            true
        });
    }

    pub(crate) fn observer(&self) -> Observer<T> {
        let state = self.state.borrow();
        match &state.outcome {
            Some(outcome) => Observer::new(outcome.clone(), None),
            None => Observer::new(
                Ok(state.response.clone()),
                state.events.as_ref().map(broadcast::Sender::subscribe),
            ),
        }
    }

    /// Waits until the poller finishes.
    pub(crate) async fn until_done(&self) -> Result<PollResponse<T>> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|s| s.outcome.is_some())
            .await
            .map_err(Error::other)?;
        match &state.outcome {
            Some(outcome) => outcome.clone(),
            None => unreachable!("wait_for() returns only once the outcome is set"),
        }
    }

    /// Waits until the latest response has `status`, or the poller finishes.
    pub(crate) async fn until_status(
        &self,
        status: &crate::OperationStatus,
    ) -> Result<PollResponse<T>> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|s| s.outcome.is_some() || s.response.status() == status)
            .await
            .map_err(Error::other)?;
        if state.response.status() == status {
            return Ok(state.response.clone());
        }
        match &state.outcome {
            Some(outcome) => outcome.clone(),
            None => unreachable!("wait_for() returns only once the outcome is set"),
        }
    }
}

/// The automatic polling loop.
///
/// A poller runs a single loop task for its whole lifetime. While `enabled`
/// is set the loop waits for the next delay, invokes the poll operation,
/// records the result, and repeats until the poller finishes. Clearing
/// `enabled` pauses the loop; a poll operation in flight is not interrupted
/// and its result is recorded before the loop pauses. The loop exits when the
/// poller finishes, when `shutdown` is cancelled, or when the `enabled`
/// sender is dropped.
///
/// Automatic polls never overlap, and the polling state used by the error
/// policy survives pauses.
pub(crate) async fn polling_loop<T>(
    shared: Arc<Shared<T>>,
    mut enabled: watch::Receiver<bool>,
    shutdown: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
{
    tracing::debug!("polling loop started");
    let mut state = PollingState::default();
    while !shared.is_finished() {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            running = wait_for_flag(&mut enabled, true) => {
                if !running {
                    break;
                }
            }
        }
        let delay = shared.next_delay();
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            paused = wait_for_flag(&mut enabled, false) => {
                if paused {
                    tracing::debug!("polling loop paused, auto-polling disabled");
                }
                continue;
            }
            _ = tokio::time::sleep(delay) => {},
        }
        state.attempt_count += 1;
        let result = shared.poll_once().await;
        if handle_poll(&shared, &state, result).is_break() {
            break;
        }
    }
    tracing::debug!("polling loop finished");
}

/// Waits until the flag has the `want` value.
///
/// Returns false if the sender was dropped.
async fn wait_for_flag(flag: &mut watch::Receiver<bool>, want: bool) -> bool {
    loop {
        if *flag.borrow_and_update() == want {
            return true;
        }
        if flag.changed().await.is_err() {
            return false;
        }
    }
}

fn handle_poll<T>(
    shared: &Shared<T>,
    state: &PollingState,
    result: Result<PollResponse<T>>,
) -> ControlFlow<()>
where
    T: Clone + Send + Sync + 'static,
{
    match result {
        Ok(response) => {
            if shared.record(response) {
                return ControlFlow::Break(());
            }
            if let Some(e) = shared.error_policy.on_in_progress(state) {
                tracing::warn!("stopping polling loop: {e}");
                shared.terminate(e);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }
        Err(e) => match shared.error_policy.on_error(state, e) {
            LoopState::Continue(e) => {
                tracing::warn!(attempt = state.attempt_count, "poll attempt failed: {e}");
                shared.publish_error(e);
                ControlFlow::Continue(())
            }
            LoopState::Permanent(e) | LoopState::Exhausted(e) => {
                tracing::warn!(attempt = state.attempt_count, "stopping polling loop: {e}");
                shared.terminate(e);
                ControlFlow::Break(())
            }
        },
    }
}

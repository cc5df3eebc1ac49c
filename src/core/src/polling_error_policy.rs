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

//! Defines the types for polling error policies.
//!
//! # Example
//! ```
//! # use lro_core::polling_error_policy::*;
//! use std::time::Duration;
//! // Continue on transient errors, for at most 15 minutes or at most 50
//! // attempts: whichever limit is reached first stops the polling loop.
//! let policy = ContinueOnTransient
//!     .with_time_limit(Duration::from_secs(15 * 60))
//!     .with_attempt_limit(50);
//! ```
//!
//! A poller runs its poll operation in a background loop. Sometimes the poll
//! operation fails, and the poller needs to decide if the failure ends the
//! polling loop or if the loop should try again at the next interval. In
//! either case the error is delivered to the poller observers.
//!
//! We provide a trait that applications may implement to customize this
//! decision, and some common implementations that should meet most needs.

use crate::error::Error;
use crate::loop_state::LoopState;
use crate::polling_state::PollingState;
use std::sync::Arc;

/// Determines how errors are handled in the polling loop.
///
/// Implementations of this trait determine if polling errors may resolve in
/// future attempts, and for how long the polling loop may continue.
pub trait PollingErrorPolicy: Send + Sync + std::fmt::Debug {
    /// Query the polling policy after an error.
    ///
    /// # Parameters
    /// * `state` - the state of the polling loop, the attempt count includes
    ///   the failed attempt and is always non-zero.
    /// * `error` - the error returned by the poll operation.
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState;

    /// Called when the operation is successfully polled, but the operation is
    /// still in progress.
    ///
    /// Returning an error stops the polling loop with that error.
    fn on_in_progress(&self, _state: &PollingState) -> Option<Error> {
        None
    }
}

/// A helper type to use [PollingErrorPolicy] in poller builders.
#[derive(Clone, Debug)]
pub struct PollingErrorPolicyArg(pub Arc<dyn PollingErrorPolicy>);

impl<T> std::convert::From<T> for PollingErrorPolicyArg
where
    T: PollingErrorPolicy + 'static,
{
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn PollingErrorPolicy>> for PollingErrorPolicyArg {
    fn from(value: Arc<dyn PollingErrorPolicy>) -> Self {
        Self(value)
    }
}

/// Extension trait for [PollingErrorPolicy]
pub trait PollingErrorPolicyExt: PollingErrorPolicy + Sized {
    /// Decorate a [PollingErrorPolicy] to limit the total elapsed time in the
    /// polling loop.
    ///
    /// While the time spent in the polling loop (including time between polls)
    /// is less than the prescribed duration the `on_error()` method returns
    /// the results of the inner policy. After that time it returns
    /// [Exhausted][LoopState::Exhausted] if the inner policy returns
    /// [Continue][LoopState::Continue].
    ///
    /// # Example
    /// ```
    /// # use lro_core::polling_error_policy::*;
    /// # use lro_core::polling_state::PollingState;
    /// # use lro_core::error::Error;
    /// use std::time::{Duration, Instant};
    /// let policy = AlwaysContinue.with_time_limit(Duration::from_secs(10));
    /// let state = PollingState::default()
    ///     .set_start(Instant::now() - Duration::from_secs(20))
    ///     .set_attempt_count(1_u32);
    /// assert!(policy.on_error(&state, Error::transient("try again")).is_exhausted());
    /// ```
    fn with_time_limit(self, maximum_duration: std::time::Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Decorate a [PollingErrorPolicy] to limit the number of poll attempts.
    ///
    /// The policy passes through the results from the inner policy as long as
    /// `attempt_count < maximum_attempts`. Once the maximum number of attempts
    /// is reached, the policy returns [Exhausted][LoopState::Exhausted] if the
    /// inner policy returns [Continue][LoopState::Continue], and passes the
    /// inner policy result otherwise.
    ///
    /// # Example
    /// ```
    /// # use lro_core::polling_error_policy::*;
    /// # use lro_core::polling_state::PollingState;
    /// # use lro_core::error::Error;
    /// let policy = AlwaysContinue.with_attempt_limit(3);
    /// let state = |n: u32| PollingState::default().set_attempt_count(n);
    /// assert!(policy.on_error(&state(1), Error::transient("err")).is_continue());
    /// assert!(policy.on_error(&state(2), Error::transient("err")).is_continue());
    /// assert!(policy.on_error(&state(3), Error::transient("err")).is_exhausted());
    /// ```
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: PollingErrorPolicy> PollingErrorPolicyExt for T {}

/// A polling policy that stops the loop on any error.
///
/// This is the default policy. The first failed poll ends the polling loop,
/// and the poller completes with that error.
///
/// # Example
/// ```
/// # use lro_core::polling_error_policy::*;
/// # use lro_core::polling_state::PollingState;
/// # use lro_core::error::Error;
/// let policy = StopOnError;
/// let state = PollingState::default().set_attempt_count(1_u32);
/// assert!(policy.on_error(&state, Error::transient("err")).is_permanent());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StopOnError;

impl PollingErrorPolicy for StopOnError {
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        LoopState::Permanent(error)
    }
}

/// A polling policy that continues on any error.
///
/// Failed polls are treated as a missed round: observers receive the error and
/// the loop polls again at the next interval. This policy should be decorated
/// to limit the number of polling attempts or the duration of the polling
/// loop.
///
/// # Example
/// ```
/// # use lro_core::polling_error_policy::*;
/// # use lro_core::polling_state::PollingState;
/// # use lro_core::error::Error;
/// let policy = AlwaysContinue;
/// let state = PollingState::default().set_attempt_count(1_u32);
/// assert!(policy.on_error(&state, Error::other("err")).is_continue());
/// ```
#[derive(Clone, Debug)]
pub struct AlwaysContinue;

impl PollingErrorPolicy for AlwaysContinue {
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        LoopState::Continue(error)
    }
}

/// A polling policy that continues only on transient errors.
///
/// Errors created with [Error::transient] continue the loop, any other error
/// stops it. This policy should be decorated to limit the number of polling
/// attempts or the duration of the polling loop.
///
/// # Example
/// ```
/// # use lro_core::polling_error_policy::*;
/// # use lro_core::polling_state::PollingState;
/// # use lro_core::error::Error;
/// let policy = ContinueOnTransient;
/// let state = PollingState::default().set_attempt_count(1_u32);
/// assert!(policy.on_error(&state, Error::transient("err")).is_continue());
/// assert!(policy.on_error(&state, Error::other("err")).is_permanent());
/// ```
#[derive(Clone, Debug)]
pub struct ContinueOnTransient;

impl PollingErrorPolicy for ContinueOnTransient {
    fn on_error(&self, _state: &PollingState, error: Error) -> LoopState {
        if error.is_transient() {
            return LoopState::Continue(error);
        }
        LoopState::Permanent(error)
    }
}

/// A polling policy decorator that limits the total time in the polling loop.
///
/// This policy decorates an inner policy and limits the duration of polling
/// loops. While the time spent in the polling loop is less than the prescribed
/// duration the `on_error()` method returns the results of the inner policy.
/// After that time it returns [Exhausted][LoopState::Exhausted] if the inner
/// policy returns [Continue][LoopState::Continue].
///
/// The policy also stops polling operations that remain in progress past the
/// deadline.
///
/// # Parameters
/// * `P` - the inner polling policy, defaults to [ContinueOnTransient].
#[derive(Debug)]
pub struct LimitedElapsedTime<P = ContinueOnTransient>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_duration: std::time::Duration,
}

impl LimitedElapsedTime {
    /// Creates a new instance, with the default inner policy.
    ///
    /// # Example
    /// ```
    /// # use lro_core::polling_error_policy::*;
    /// # use lro_core::polling_state::PollingState;
    /// # use lro_core::error::Error;
    /// use std::time::{Duration, Instant};
    /// let policy = LimitedElapsedTime::new(Duration::from_secs(10));
    /// let state = PollingState::default().set_start(Instant::now() - Duration::from_secs(20));
    /// assert!(policy.on_error(&state, Error::transient("err")).is_exhausted());
    /// ```
    pub fn new(maximum_duration: std::time::Duration) -> Self {
        Self {
            inner: ContinueOnTransient,
            maximum_duration,
        }
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_duration: std::time::Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn in_progress_impl(&self, start: std::time::Instant) -> Option<Error> {
        let elapsed = start.elapsed();
        if elapsed < self.maximum_duration {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            "elapsed time",
            format!("{elapsed:?}"),
            format!("{:?}", self.maximum_duration),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedElapsedTime<P>
where
    P: PollingErrorPolicy + 'static,
{
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState {
        match self.inner.on_error(state, error) {
            LoopState::Continue(e) if state.start.elapsed() >= self.maximum_duration => {
                LoopState::Exhausted(e)
            }
            decision => decision,
        }
    }

    fn on_in_progress(&self, state: &PollingState) -> Option<Error> {
        self.inner
            .on_in_progress(state)
            .or_else(|| self.in_progress_impl(state.start))
    }
}

/// A polling policy decorator that limits the number of attempts.
///
/// The policy passes through the results from the inner policy as long as
/// `attempt_count < maximum_attempts`. However, once the maximum number of
/// attempts is reached, the policy replaces any [Continue][LoopState::Continue]
/// result with [Exhausted][LoopState::Exhausted].
///
/// The policy also stops polling operations that remain in progress after the
/// maximum number of attempts.
///
/// # Parameters
/// * `P` - the inner polling policy, defaults to [ContinueOnTransient].
#[derive(Debug)]
pub struct LimitedAttemptCount<P = ContinueOnTransient>
where
    P: PollingErrorPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Creates a new instance, with the default inner policy.
    ///
    /// # Example
    /// ```
    /// # use lro_core::polling_error_policy::*;
    /// # use lro_core::polling_state::PollingState;
    /// # use lro_core::error::Error;
    /// let policy = LimitedAttemptCount::new(5);
    /// let state = PollingState::default().set_attempt_count(10_u32);
    /// assert!(policy.on_error(&state, Error::transient("err")).is_exhausted());
    /// ```
    pub fn new(maximum_attempts: u32) -> Self {
        Self {
            inner: ContinueOnTransient,
            maximum_attempts,
        }
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }

    fn in_progress_impl(&self, count: u32) -> Option<Error> {
        if count < self.maximum_attempts {
            return None;
        }
        Some(Error::exhausted(Exhausted::new(
            "attempt count",
            count.to_string(),
            self.maximum_attempts.to_string(),
        )))
    }
}

impl<P> PollingErrorPolicy for LimitedAttemptCount<P>
where
    P: PollingErrorPolicy,
{
    fn on_error(&self, state: &PollingState, error: Error) -> LoopState {
        match self.inner.on_error(state, error) {
            LoopState::Continue(e) if state.attempt_count >= self.maximum_attempts => {
                LoopState::Exhausted(e)
            }
            decision => decision,
        }
    }

    fn on_in_progress(&self, state: &PollingState) -> Option<Error> {
        self.inner
            .on_in_progress(state)
            .or_else(|| self.in_progress_impl(state.attempt_count))
    }
}

/// Indicates that a polling loop has been exhausted.
#[derive(thiserror::Error, Debug)]
#[error("polling loop exhausted, {limit_name} value ({value}) exceeds limit ({limit})")]
pub struct Exhausted {
    limit_name: &'static str,
    value: String,
    limit: String,
}

impl Exhausted {
    pub fn new(limit_name: &'static str, value: String, limit: String) -> Self {
        Self {
            limit_name,
            value,
            limit,
        }
    }
}

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

//! Types and functions to make long-running operations (LROs) easier to use.
//!
//! Services start long-running operations in one request, and report their
//! progress through a separate status endpoint. The [Poller] repeatedly calls
//! an application-supplied poll operation until the operation reaches a
//! terminal [OperationStatus]. Applications can wait for the result, watch the
//! progress through any number of [Observer]s, or drive the polling manually.
//!
//! The poll operation is a closure receiving the latest [PollResponse] and
//! returning the next one. The poller runs on the tokio runtime.
//!
//! # Example
//! ```
//! # use lro::{OperationStatus, PollResponse, Poller};
//! # use std::time::Duration;
//! # tokio_test::block_on(async {
//! let poller = Poller::new(Duration::from_millis(100), |previous: PollResponse<String>| async move {
//!     // Typically this queries the service using state saved in `previous`.
//!     let status = match previous.status() {
//!         OperationStatus::NotStarted => OperationStatus::InProgress,
//!         _ => OperationStatus::SuccessfullyCompleted,
//!     };
//!     Ok(PollResponse::new(status, Some("result".to_string())))
//! })?;
//! let response = poller.until_done().await?;
//! assert_eq!(response.value().map(String::as_str), Some("result"));
//! # Ok::<(), lro::Error>(()) });
//! ```
//!
//! # Features
//! * `unstable-stream`: enables [Observer::into_stream]. This functionality
//!   depends on the [futures::Stream] trait, and may change as the trait is
//!   stabilized.
//!
//! [futures::Stream]: https://docs.rs/futures/latest/futures/stream/trait.Stream.html

pub use lro_core::Result;
pub use lro_core::error::Error;
pub use lro_core::{loop_state, polling_error_policy, polling_state};

mod builder;
pub use builder::{DEFAULT_OBSERVER_CAPACITY, PollerBuilder};

mod details;

mod observer;
pub use observer::Observer;

mod poller;
pub use poller::Poller;

mod response;
pub use response::PollResponse;

mod status;
pub use status::{OperationStatus, StatusError, is_terminal};

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

//! Long-running operation helpers.
//!
//! This crate contains the error type and the polling loop control types
//! shared by the long-running operation pollers. Most applications use these
//! types through the `lro` crate, which re-exports them.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type returned by poll operations and by the poller.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error type used by the pollers.
pub mod error;

pub mod loop_state;
pub mod polling_error_policy;
pub mod polling_state;

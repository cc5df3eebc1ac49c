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

//! Polling loop control types.
//!
//! Applications only need to use these types when implementing their own
//! polling error policies.

use crate::error::Error;

/// The decision of a polling error policy after a failed poll.
#[derive(Debug)]
pub enum LoopState {
    /// The error is not recoverable, stop the loop.
    Permanent(Error),

    /// The error may be recoverable, but the policy is stopping the loop.
    ///
    /// Policies may stop the loop on recoverable errors, for example, because
    /// the policy only allows a limited number of attempts.
    Exhausted(Error),

    /// The error may be recoverable, continue the loop.
    Continue(Error),
}

impl LoopState {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

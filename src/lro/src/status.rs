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

use crate::{Error, Result};

/// The status of a long-running operation.
///
/// Services report the progress of long-running operations using a small set
/// of well-known states. Some services report additional, service-specific
/// states; these are represented as [OperationStatus::Other] and are never
/// terminal.
///
/// # Example
/// ```
/// # use lro::OperationStatus;
/// let status: OperationStatus = "IN_PROGRESS".parse()?;
/// assert_eq!(status, OperationStatus::InProgress);
/// assert!(!status.is_terminal());
///
/// let status = OperationStatus::other("WAITING_FOR_QUOTA")?;
/// assert!(!status.is_terminal());
/// # Ok::<(), lro::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OperationStatus {
    /// The operation has not started. This is the status of a poller before
    /// its first poll completes.
    NotStarted,
    /// The operation is running in the service.
    InProgress,
    /// The operation completed successfully.
    SuccessfullyCompleted,
    /// The operation completed with a failure.
    Failed,
    /// The operation was cancelled at the request of the application.
    UserCancelled,
    /// A service-specific, non-terminal status.
    ///
    /// Use [OperationStatus::other] to create these values, it validates the
    /// description is not blank.
    Other(String),
}

impl OperationStatus {
    /// Creates a service-specific status.
    ///
    /// Fails with an [invalid argument][Error::is_invalid_argument] error if
    /// `description` is empty or only contains whitespace.
    pub fn other<T: Into<String>>(description: T) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(Error::invalid_argument(StatusError::BlankDescription));
        }
        Ok(Self::Other(description))
    }

    /// Returns true if no further state transitions occur after this status.
    pub fn is_terminal(&self) -> bool {
        is_terminal(self)
    }

    /// The canonical name for this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::SuccessfullyCompleted => "SUCCESSFULLY_COMPLETED",
            Self::Failed => "FAILED",
            Self::UserCancelled => "USER_CANCELLED",
            Self::Other(description) => description,
        }
    }
}

/// Returns true if `status` is one of the terminal states.
///
/// The terminal states are [SuccessfullyCompleted][OperationStatus::SuccessfullyCompleted],
/// [Failed][OperationStatus::Failed], and [UserCancelled][OperationStatus::UserCancelled].
pub fn is_terminal(status: &OperationStatus) -> bool {
    match status {
        OperationStatus::SuccessfullyCompleted
        | OperationStatus::Failed
        | OperationStatus::UserCancelled => true,
        OperationStatus::NotStarted | OperationStatus::InProgress | OperationStatus::Other(_) => {
            false
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NOT_STARTED" => Ok(Self::NotStarted),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "SUCCESSFULLY_COMPLETED" => Ok(Self::SuccessfullyCompleted),
            "FAILED" => Ok(Self::Failed),
            "USER_CANCELLED" => Ok(Self::UserCancelled),
            _ => Self::other(s),
        }
    }
}

impl serde::ser::Serialize for OperationStatus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::de::Deserialize<'de> for OperationStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Describes why a status value is invalid.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StatusError {
    /// Service-specific statuses require a description.
    #[error("a custom operation status requires a non-blank description")]
    BlankDescription,
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
    #[test_case(OperationStatus::Other("WAITING".into()), false)]
    fn terminal(status: OperationStatus, want: bool) {
        assert_eq!(status.is_terminal(), want, "{status:?}");
        assert_eq!(is_terminal(&status), want, "{status:?}");
    }

    #[test_case("")]
    #[test_case("   ")]
    #[test_case("\t\n")]
    fn other_blank(input: &str) {
        let err = OperationStatus::other(input).unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");
        assert!(
            matches!(err.as_inner::<StatusError>(), Some(StatusError::BlankDescription)),
            "{err:?}"
        );
    }

    #[test]
    fn other_with_description() -> anyhow::Result<()> {
        let status = OperationStatus::other("WAITING_FOR_QUOTA")?;
        assert_eq!(status, OperationStatus::Other("WAITING_FOR_QUOTA".into()));
        assert_eq!(status.as_str(), "WAITING_FOR_QUOTA");
        assert_eq!(status.to_string(), "WAITING_FOR_QUOTA");
        Ok(())
    }

    #[test_case("NOT_STARTED", OperationStatus::NotStarted)]
    #[test_case("IN_PROGRESS", OperationStatus::InProgress)]
    #[test_case("SUCCESSFULLY_COMPLETED", OperationStatus::SuccessfullyCompleted)]
    #[test_case("FAILED", OperationStatus::Failed)]
    #[test_case("USER_CANCELLED", OperationStatus::UserCancelled)]
    #[test_case("PAUSED", OperationStatus::Other("PAUSED".into()))]
    fn names(name: &str, want: OperationStatus) -> anyhow::Result<()> {
        let got = name.parse::<OperationStatus>()?;
        assert_eq!(got, want);
        assert_eq!(got.as_str(), name);
        Ok(())
    }

    #[test]
    fn parse_blank() {
        let got = "".parse::<OperationStatus>();
        assert!(
            got.as_ref().is_err_and(|e| e.is_invalid_argument()),
            "{got:?}"
        );
    }

    #[test]
    fn serde() -> anyhow::Result<()> {
        let got = serde_json::to_value(OperationStatus::UserCancelled)?;
        assert_eq!(got, serde_json::json!("USER_CANCELLED"));

        let got = serde_json::from_value::<OperationStatus>(serde_json::json!("FAILED"))?;
        assert_eq!(got, OperationStatus::Failed);

        let got = serde_json::from_value::<OperationStatus>(serde_json::json!("SCALING"))?;
        assert_eq!(got, OperationStatus::Other("SCALING".into()));

        let got = serde_json::from_value::<OperationStatus>(serde_json::json!(" "));
        assert!(got.is_err(), "{got:?}");
        Ok(())
    }
}

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

use std::error::Error as StdError;
use std::sync::Arc;

type BoxError = Box<dyn StdError + Send + Sync>;
type SharedError = Arc<dyn StdError + Send + Sync>;

/// The error returned by the pollers and by poll operations.
///
/// Errors come from multiple sources. The application may configure a poller
/// with invalid arguments, call an operation the poller does not support, or
/// wait longer than it is willing to. Most often, the poll operation itself
/// fails, for example because the service could not be reached.
///
/// The type offers a series of predicates to determine the error kind.
/// Applications can query the error [source][std::error::Error::source] for
/// deeper information.
///
/// Errors are cheap to clone: a single failed poll may be delivered to many
/// observers of the same poller.
///
/// # Example
/// ```
/// use lro_core::error::Error;
/// match example_function() {
///     Err(e) if e.is_transient() => { println!("try again later {e}"); },
///     Err(e) if e.is_timeout() => { println!("not enough time {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # Err(Error::transient("connection reset"))
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<SharedError>,
}

impl Error {
    /// Creates an error representing a required argument that was not provided.
    ///
    /// # Example
    /// ```
    /// use lro_core::error::Error;
    /// let error = Error::missing_argument("poll_interval");
    /// assert!(error.is_missing_argument());
    /// assert_eq!(error.argument_name(), Some("poll_interval"));
    /// ```
    pub fn missing_argument(name: &'static str) -> Self {
        Self {
            kind: ErrorKind::MissingArgument(name),
            source: None,
        }
    }

    /// A required argument was not provided.
    ///
    /// This is always a client-side generated error, detected before any
    /// polling starts.
    pub fn is_missing_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingArgument(_))
    }

    /// The name of the missing argument, if this is a
    /// [missing argument][Error::is_missing_argument] error.
    pub fn argument_name(&self) -> Option<&'static str> {
        match &self.kind {
            ErrorKind::MissingArgument(name) => Some(name),
            _ => None,
        }
    }

    /// Creates an error representing an argument with an invalid value.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use lro_core::error::Error;
    /// let error = Error::invalid_argument("poll interval must be positive");
    /// assert!(error.is_invalid_argument());
    /// assert!(error.source().is_some());
    /// ```
    pub fn invalid_argument<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::InvalidArgument, source)
    }

    /// An argument had an invalid value.
    ///
    /// # Troubleshooting
    ///
    /// Poll intervals must be strictly positive, and custom operation statuses
    /// require a non-blank description. The error source describes the
    /// offending value.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument)
    }

    /// Creates an error representing a missing or unusable async runtime.
    ///
    /// # Example
    /// ```
    /// use lro_core::error::Error;
    /// let error = Error::runtime("no reactor running");
    /// assert!(error.is_runtime());
    /// ```
    pub fn runtime<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Runtime, source)
    }

    /// The poller could not find a runtime to run its polling loop.
    ///
    /// # Troubleshooting
    ///
    /// Create the poller from within a tokio runtime, or provide a runtime
    /// handle when building the poller.
    pub fn is_runtime(&self) -> bool {
        matches!(self.kind, ErrorKind::Runtime)
    }

    /// Creates an error representing an operation the poller does not support.
    ///
    /// # Example
    /// ```
    /// use lro_core::error::Error;
    /// let error = Error::unsupported("cancellation is not configured");
    /// assert!(error.is_unsupported());
    /// ```
    pub fn unsupported<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Unsupported, source)
    }

    /// The requested operation is not supported by this poller.
    ///
    /// For example, cancelling a poller that was created without a cancel
    /// operation.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported)
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use lro_core::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Timeout, source)
    }

    /// The operation did not complete before the deadline set by the caller.
    ///
    /// This is always a client-side generated error. The long-running
    /// operation may still complete in the service, and the poller keeps
    /// tracking it.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing an exhausted polling policy.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use lro_core::error::Error;
    /// let error = Error::exhausted("too many polling attempts");
    /// assert!(error.is_exhausted());
    /// assert!(error.source().is_some());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Exhausted, source)
    }

    /// The polling loop stopped because the polling error policy expired.
    ///
    /// # Troubleshooting
    ///
    /// The most common cause of this problem is a long-running operation that
    /// takes longer than the limits configured in the polling error policy.
    /// Consider extending the policy limits.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Creates an error that may resolve in a future poll attempt.
    ///
    /// Poll operations use this constructor for problems such as dropped
    /// connections or a temporarily unavailable service.
    ///
    /// # Example
    /// ```
    /// use lro_core::error::Error;
    /// let error = Error::transient("connection reset by peer");
    /// assert!(error.is_transient());
    /// ```
    pub fn transient<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Transient, source)
    }

    /// The poll operation failed, but a future attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::Transient)
    }

    /// Creates an error with a source that does not fit any other category.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use lro_core::error::Error;
    /// let error = Error::other("the operation was deleted");
    /// assert!(error.source().is_some());
    /// ```
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self::new(ErrorKind::Other, source)
    }

    /// Returns the source of the error as `T`, if it has that type.
    ///
    /// # Example
    /// ```
    /// use lro_core::error::Error;
    /// let error = Error::other(std::io::Error::other("bad file"));
    /// let io = error.as_inner::<std::io::Error>();
    /// assert!(io.is_some());
    /// ```
    pub fn as_inner<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.as_deref()?.downcast_ref::<T>()
    }

    fn new<T: Into<BoxError>>(kind: ErrorKind, source: T) -> Self {
        Self {
            kind,
            source: Some(Arc::from(source.into())),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::MissingArgument(name), _) => {
                write!(f, "the required argument `{name}` was not provided")
            }
            (ErrorKind::InvalidArgument, Some(e)) => write!(f, "invalid argument: {e}"),
            (ErrorKind::Runtime, Some(e)) => {
                write!(f, "cannot start the polling loop: {e}")
            }
            (ErrorKind::Unsupported, Some(e)) => write!(f, "unsupported operation: {e}"),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the operation did not complete in time: {e}")
            }
            (ErrorKind::Exhausted, Some(e)) => write!(f, "{e}"),
            (ErrorKind::Transient, Some(e)) => {
                write!(f, "transient error polling the operation: {e}")
            }
            (ErrorKind::Other, Some(e)) => {
                write!(f, "an unclassified problem polling the operation: {e}")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

#[derive(Clone, Debug)]
enum ErrorKind {
    MissingArgument(&'static str),
    InvalidArgument,
    Runtime,
    Unsupported,
    Timeout,
    Exhausted,
    Transient,
    /// A uncategorized error.
    Other,
}

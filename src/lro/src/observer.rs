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

use crate::{PollResponse, Result};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Observes the responses of a [Poller][crate::Poller].
///
/// Observers share the polling loop of their poller: creating an observer
/// never triggers additional polls, no matter how many observers exist.
///
/// An observer first returns the latest response known to the poller at the
/// time the observer was created. It then returns each new response and each
/// failed automatic poll, in order. After the operation completes, or after
/// the polling loop stops on an error, [next][Observer::next] returns `None`.
///
/// Observers that fall too far behind the poller skip the responses they
/// missed.
///
/// # Example
/// ```
/// # use lro::{OperationStatus, PollResponse, Poller};
/// # use std::time::Duration;
/// # tokio_test::block_on(async {
/// let poller = Poller::new(Duration::from_millis(10), |_| async {
///     Ok(PollResponse::new(OperationStatus::SuccessfullyCompleted, Some("done")))
/// })?;
/// let mut observer = poller.observer();
/// while let Some(response) = observer.next().await {
///     println!("status is {}", response?.status());
/// }
/// # Ok::<(), lro::Error>(()) });
/// ```
#[derive(Debug)]
pub struct Observer<T> {
    replay: Option<Result<PollResponse<T>>>,
    events: Option<broadcast::Receiver<Result<PollResponse<T>>>>,
}

impl<T> Observer<T>
where
    T: Clone,
{
    pub(crate) fn new(
        replay: Result<PollResponse<T>>,
        events: Option<broadcast::Receiver<Result<PollResponse<T>>>>,
    ) -> Self {
        Self {
            replay: Some(replay),
            events,
        }
    }

    /// Waits for the next response.
    ///
    /// Returns `None` once the poller has finished and all its responses were
    /// returned.
    pub async fn next(&mut self) -> Option<Result<PollResponse<T>>> {
        if let Some(item) = self.replay.take() {
            return Some(item);
        }
        let events = self.events.as_mut()?;
        loop {
            match events.recv().await {
                Ok(item) => return Some(item),
                Err(RecvError::Lagged(count)) => {
                    tracing::warn!("observer fell behind the poller, skipped {count} responses");
                }
                Err(RecvError::Closed) => {
                    self.events = None;
                    return None;
                }
            }
        }
    }

    /// Converts the observer to a [futures::Stream].
    #[cfg(feature = "unstable-stream")]
    pub fn into_stream(self) -> impl futures::Stream<Item = Result<PollResponse<T>>> + Unpin
    where
        T: Send + 'static,
    {
        use futures::stream::unfold;
        Box::pin(unfold(self, |mut observer| async move {
            observer.next().await.map(|item| (item, observer))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, OperationStatus};

    fn response(v: i32) -> PollResponse<i32> {
        PollResponse::new(OperationStatus::InProgress, Some(v))
    }

    #[tokio::test]
    async fn replay_only() {
        let mut observer = Observer::new(Ok(response(1)), None);
        let got = observer.next().await;
        assert!(matches!(got, Some(Ok(ref r)) if r == &response(1)), "{got:?}");
        let got = observer.next().await;
        assert!(got.is_none(), "{got:?}");
    }

    #[tokio::test]
    async fn replay_error() {
        let mut observer = Observer::<i32>::new(Err(Error::other("test-only")), None);
        let got = observer.next().await;
        assert!(matches!(got, Some(Err(_))), "{got:?}");
        assert!(observer.next().await.is_none());
    }

    #[tokio::test]
    async fn lagged() -> anyhow::Result<()> {
        let (tx, rx) = broadcast::channel(2);
        let mut observer = Observer::new(Ok(response(0)), Some(rx));
        for i in 1..=5 {
            tx.send(Ok(response(i)))?;
        }
        drop(tx);

        let got = observer.next().await;
        assert!(matches!(got, Some(Ok(ref r)) if r == &response(0)), "{got:?}");
        // Responses 1, 2, and 3 were lost.
        let got = observer.next().await;
        assert!(matches!(got, Some(Ok(ref r)) if r == &response(4)), "{got:?}");
        let got = observer.next().await;
        assert!(matches!(got, Some(Ok(ref r)) if r == &response(5)), "{got:?}");
        let got = observer.next().await;
        assert!(got.is_none(), "{got:?}");
        Ok(())
    }

    #[cfg(feature = "unstable-stream")]
    #[tokio::test]
    async fn stream() -> anyhow::Result<()> {
        use futures::StreamExt;
        let (tx, rx) = broadcast::channel(4);
        let observer = Observer::new(Ok(response(0)), Some(rx));
        tx.send(Ok(response(1)))?;
        drop(tx);

        let got = observer
            .into_stream()
            .map(|r| r.map(|r| r.into_value()))
            .collect::<Vec<_>>()
            .await;
        let got = got.into_iter().collect::<lro_core::Result<Vec<_>>>()?;
        assert_eq!(got, vec![Some(0), Some(1)]);
        Ok(())
    }
}

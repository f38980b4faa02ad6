//! Fixed-cadence ingestion scheduling.
//!
//! A [`FeedPoller`] fires one ingestion cycle per period: fetch the feed,
//! decode the body, deliver the payload through a channel. Polling is
//! unconditionally periodic, with no overlap suppression.
//! If a fetch has not completed when the next tick fires, both requests are
//! in flight independently, and cycles are delivered in *completion* order,
//! which may differ from issue order. [`Cycle::seq`] carries the issue order
//! so consumers can observe reordering; the rendering layer is required to
//! tolerate it (see [`crate::buffer::RollingBuffer`]).
//!
//! The poller supports graceful shutdown via [`FeedPoller::close`], which
//! uses a cancellation token to stop the scheduling task. In-flight fetches
//! are not aborted; their cycles are simply dropped with the channel.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::Stream;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use roomtel_types::{Payload, PayloadKind};

use crate::client::{Endpoint, FeedClient};
use crate::error::Result;

/// Options for feed polling.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Period between issued cycles. Observed dashboard defaults: 1 s for
    /// snapshot feeds, 2–3 s for chart feeds.
    pub period: Duration,
    /// Buffer size for the cycle channel. Default: 16 cycles.
    pub buffer_size: usize,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            buffer_size: 16,
        }
    }
}

impl PollOptions {
    /// Create options with a specific period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.period.is_zero() {
            return Err(crate::error::Error::invalid_config("period must be > 0"));
        }
        if self.buffer_size == 0 {
            return Err(crate::error::Error::invalid_config(
                "buffer_size must be > 0",
            ));
        }
        Ok(())
    }
}

/// One completed ingestion cycle.
#[derive(Debug, Clone)]
pub struct Cycle {
    /// Issue order of the cycle's fetch (0-based). Delivery order may
    /// differ when fetches overlap.
    pub seq: u64,
    /// Receipt time in unix milliseconds, used to stamp points from feeds
    /// whose grammar carries no timestamp.
    pub received_at_ms: i64,
    /// The decoded payload.
    pub payload: Payload,
}

/// A stream of decoded ingestion cycles from one feed endpoint.
pub struct FeedPoller {
    receiver: mpsc::Receiver<Cycle>,
    handle: tokio::task::JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Milliseconds since the unix epoch, saturating at zero on clock error.
pub fn unix_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}

impl FeedPoller {
    /// Spawn the scheduling task for one feed.
    ///
    /// Every tick issues an independent fetch+decode task; a transport
    /// failure or bad status skips that cycle with a warning and the next
    /// tick retries.
    pub fn spawn(
        client: FeedClient,
        endpoint: Endpoint,
        kind: PayloadKind,
        options: PollOptions,
    ) -> Self {
        let (tx, rx) = mpsc::channel(options.buffer_size);
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval(options.period);
            let mut seq: u64 = 0;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!(endpoint = endpoint.path(), "poller cancelled, stopping");
                        break;
                    }
                    _ = interval.tick() => {
                        if tx.is_closed() {
                            debug!(endpoint = endpoint.path(), "cycle receiver dropped, stopping");
                            break;
                        }
                        let client = client.clone();
                        let tx = tx.clone();
                        let cycle_seq = seq;
                        seq += 1;

                        // Independent task per tick: no overlap suppression,
                        // completion order may differ from issue order.
                        tokio::spawn(async move {
                            match client.fetch(endpoint).await {
                                Ok(body) => {
                                    let cycle = Cycle {
                                        seq: cycle_seq,
                                        received_at_ms: unix_millis(),
                                        payload: Payload::decode(&body, kind),
                                    };
                                    let _ = tx.send(cycle).await;
                                }
                                Err(e) => {
                                    warn!(
                                        endpoint = endpoint.path(),
                                        seq = cycle_seq,
                                        "cycle skipped: {e}"
                                    );
                                }
                            }
                        });
                    }
                }
            }
        });

        Self {
            receiver: rx,
            handle,
            cancel_token,
        }
    }

    /// Receive the next completed cycle.
    pub async fn recv(&mut self) -> Option<Cycle> {
        self.receiver.recv().await
    }

    /// Close the poller and stop the scheduling task gracefully.
    pub fn close(self) {
        self.cancel_token.cancel();
    }

    /// Token for cancelling the poller externally.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Whether the scheduling task is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for FeedPoller {
    fn drop(&mut self) {
        // Stop the scheduling task if the poller is dropped without close().
        self.cancel_token.cancel();
    }
}

impl Stream for FeedPoller {
    type Item = Cycle;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomtel_types::schema;

    #[test]
    fn options_default() {
        let opts = PollOptions::default();
        assert_eq!(opts.period, Duration::from_secs(1));
        assert_eq!(opts.buffer_size, 16);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn options_reject_zero_period() {
        let opts = PollOptions::with_period(Duration::ZERO);
        assert!(opts.validate().is_err());

        let opts = PollOptions {
            buffer_size: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[tokio::test]
    async fn unreachable_feed_skips_cycles_and_cancels_cleanly() {
        // Nothing listens on this address; every cycle is skipped, the
        // poller stays alive, and cancellation stops it.
        let client = FeedClient::new("http://127.0.0.1:9").unwrap();
        let poller = FeedPoller::spawn(
            client,
            Endpoint::Data,
            PayloadKind::Snapshot(&schema::SNAPSHOT),
            PollOptions::with_period(Duration::from_millis(10)),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(poller.is_active());

        let token = poller.cancellation_token();
        poller.close();
        token.cancelled().await;
    }
}

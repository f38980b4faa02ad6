//! Dashboard assembly: one snapshot panel plus per-room chart pipelines,
//! driven by polling cycles.
//!
//! The dashboard itself holds no async machinery. Cycles arrive from
//! [`FeedPoller`](crate::poller::FeedPoller)s and are applied in arrival
//! order on the caller's task; [`Dashboard::run`] is a convenience loop that
//! drains up to two feeds until cancellation.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::poller::{Cycle, FeedPoller};
use crate::series::SeriesRenderer;
use crate::snapshot::SnapshotRenderer;
use crate::surface::{ChartSurface, DisplayTarget};

/// A snapshot panel and a set of chart pipelines over shared feeds.
pub struct Dashboard<D: DisplayTarget, C: ChartSurface> {
    snapshot: SnapshotRenderer<D>,
    charts: Vec<SeriesRenderer<C>>,
    snapshot_cycles: u64,
    series_cycles: u64,
}

impl<D: DisplayTarget, C: ChartSurface> Dashboard<D, C> {
    pub fn new(snapshot: SnapshotRenderer<D>, charts: Vec<SeriesRenderer<C>>) -> Self {
        Self {
            snapshot,
            charts,
            snapshot_cycles: 0,
            series_cycles: 0,
        }
    }

    /// Apply one snapshot-feed cycle: demultiplex and update the panel.
    ///
    /// Entities absent this cycle keep whatever the panel last showed.
    pub fn apply_snapshot(&mut self, cycle: &Cycle) {
        debug!(seq = cycle.seq, "snapshot cycle");
        self.snapshot.render_all(&cycle.payload.latest());
        self.snapshot_cycles += 1;
    }

    /// Apply one chart-feed cycle to every chart pipeline.
    pub fn apply_series(&mut self, cycle: &Cycle) {
        debug!(seq = cycle.seq, "series cycle");
        for chart in &mut self.charts {
            chart.apply(&cycle.payload, cycle.received_at_ms);
        }
        self.series_cycles += 1;
    }

    /// Drain both feeds until cancellation or both feeds close.
    ///
    /// Pass `None` for a feed the dashboard does not use; the other keeps
    /// running. Cycles are applied strictly in the order they arrive.
    pub async fn run(
        &mut self,
        mut snapshot_feed: Option<FeedPoller>,
        mut series_feed: Option<FeedPoller>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                cycle = recv_opt(&mut snapshot_feed) => match cycle {
                    Some(cycle) => self.apply_snapshot(&cycle),
                    None => break,
                },
                cycle = recv_opt(&mut series_feed) => match cycle {
                    Some(cycle) => self.apply_series(&cycle),
                    None => break,
                },
            }
        }
    }

    pub fn snapshot(&self) -> &SnapshotRenderer<D> {
        &self.snapshot
    }

    pub fn charts(&self) -> &[SeriesRenderer<C>] {
        &self.charts
    }

    /// Cycles applied so far, as `(snapshot, series)`.
    pub fn cycles(&self) -> (u64, u64) {
        (self.snapshot_cycles, self.series_cycles)
    }
}

/// Receive from a feed that may not exist; a missing feed never yields.
async fn recv_opt(feed: &mut Option<FeedPoller>) -> Option<Cycle> {
    match feed {
        Some(feed) => feed.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ChartCall, MockChart, MockDisplay};
    use crate::buffer::RollingBuffer;
    use crate::poller::unix_millis;
    use crate::series::MetricSeries;
    use roomtel_types::{Field, HistoryFraming, Payload, PayloadKind, schema};
    use time::UtcOffset;

    fn cycle(seq: u64, payload: Payload) -> Cycle {
        Cycle {
            seq,
            received_at_ms: unix_millis(),
            payload,
        }
    }

    #[test]
    fn snapshot_and_series_cycles_update_their_surfaces() {
        let snapshot = SnapshotRenderer::with_offset(
            MockDisplay::new(),
            vec![Field::EntityId, Field::Temperature],
            UtcOffset::UTC,
        );
        let charts = vec![SeriesRenderer::new(
            0,
            vec![MetricSeries::new(
                Field::Temperature,
                RollingBuffer::new(),
                MockChart::new(),
            )],
        )];
        let mut dashboard = Dashboard::new(snapshot, charts);

        let body = "living_room;1700000000;21.8;39.9;1013.2;102.4";
        dashboard.apply_snapshot(&cycle(
            0,
            Payload::decode(body, PayloadKind::Snapshot(&schema::SNAPSHOT)),
        ));

        let body = "living_room,1700000000,21.8,39.9,1013.2,102.4";
        dashboard.apply_series(&cycle(
            0,
            Payload::decode(
                body,
                PayloadKind::History {
                    schema: &schema::HISTORY_TUPLE,
                    framing: HistoryFraming::EntityLines,
                },
            ),
        ));

        assert_eq!(
            dashboard.snapshot().target().get(0, Field::Temperature),
            Some("21.8")
        );
        let calls = dashboard.charts()[0].series()[0].chart().calls();
        assert!(matches!(calls[0], ChartCall::SetData { .. }));
        assert_eq!(dashboard.cycles(), (1, 1));
    }

    #[tokio::test]
    async fn run_returns_on_cancellation() {
        let snapshot = SnapshotRenderer::with_offset(
            MockDisplay::new(),
            vec![Field::Temperature],
            UtcOffset::UTC,
        );
        let mut dashboard: Dashboard<MockDisplay, MockChart> = Dashboard::new(snapshot, vec![]);

        let cancel = CancellationToken::new();
        cancel.cancel();
        dashboard.run(None, None, cancel).await;
        assert_eq!(dashboard.cycles(), (0, 0));
    }
}

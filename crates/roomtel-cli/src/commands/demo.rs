//! Demo command implementation.
//!
//! Runs the full dashboard against a simulated multi-room feed, with no
//! network or hardware. Each tick steps the simulation, decodes the bodies
//! it would have served, and applies them exactly like live cycles.

use std::time::Duration;

use anyhow::Result;

use roomtel_core::{
    Cycle, Dashboard, MetricSeries, MockFeed, RollingBuffer, SeriesRenderer, SnapshotRenderer,
    unix_millis,
};
use roomtel_types::{Field, HistoryFraming, Payload, PayloadKind, schema};

use crate::config::Config;
use crate::term::{TermChart, TermDisplay};

/// Arguments for the demo command.
pub struct DemoArgs {
    pub interval_ms: u64,
    pub count: u32,
}

pub async fn cmd_demo(config: &Config, args: DemoArgs) -> Result<()> {
    let rooms: Vec<&str> = config.rooms.iter().map(String::as_str).collect();
    let mut feed = MockFeed::new(&rooms, unix_millis() / 1000);
    let step_secs = (args.interval_ms / 1000).max(1) as i64;

    let snapshot_fields = vec![
        Field::EntityId,
        Field::Timestamp,
        Field::Temperature,
        Field::Humidity,
        Field::Pressure,
    ];
    let snapshot = SnapshotRenderer::new(
        TermDisplay::new(config.rooms.clone(), config.no_color),
        snapshot_fields.clone(),
    );
    let charts = config
        .rooms
        .iter()
        .enumerate()
        .map(|(entity, room)| {
            SeriesRenderer::new(
                entity,
                vec![MetricSeries::new(
                    Field::Temperature,
                    RollingBuffer::with_window(config.window),
                    TermChart::new(room.clone(), config.no_color),
                )],
            )
        })
        .collect();
    let mut dashboard = Dashboard::new(snapshot, charts);

    eprintln!("Demo: {} simulated rooms | Press Ctrl+C to stop", rooms.len());
    eprintln!("{}", "-".repeat(50));

    let mut seq: u64 = 0;
    loop {
        feed.step(step_secs);
        let received_at_ms = unix_millis();

        dashboard.apply_snapshot(&Cycle {
            seq,
            received_at_ms,
            payload: Payload::decode(
                &feed.snapshot_body(),
                PayloadKind::Snapshot(&schema::SNAPSHOT),
            ),
        });
        dashboard.apply_series(&Cycle {
            seq,
            received_at_ms,
            payload: Payload::decode(
                &feed.history_body(),
                PayloadKind::History {
                    schema: &schema::HISTORY_TUPLE,
                    framing: HistoryFraming::EntityLines,
                },
            ),
        });

        print!("{}", dashboard.snapshot().target().render(&snapshot_fields));
        for renderer in dashboard.charts() {
            println!("{}", renderer.series()[0].chart().render());
        }
        println!();

        seq += 1;
        if args.count > 0 && seq >= u64::from(args.count) {
            eprintln!("Completed {} cycles.", seq);
            return Ok(());
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_millis(args.interval_ms)) => {}
        }
    }
}

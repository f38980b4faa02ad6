//! Watch command implementation.
//!
//! Polls the snapshot feed at a fixed cadence and prints the current
//! per-room values after every cycle. A slow response never delays the
//! next poll; cycles that fail are logged by the poller and skipped.

use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;

use roomtel_core::{Endpoint, FeedClient, FeedPoller, PollOptions};
use roomtel_core::{SnapshotRenderer, unix_millis};
use roomtel_types::{Field, PayloadKind};

use crate::commands::OutputFormat;
use crate::config::{Config, payload_kind};
use crate::term::TermDisplay;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub url: Option<String>,
    pub layout: Option<String>,
    pub interval_ms: Option<u64>,
    pub count: u32,
    pub format: OutputFormat,
}

/// The endpoint a feed layout is served from.
fn endpoint_for(layout: &str) -> Endpoint {
    match layout {
        "history" => Endpoint::AllData,
        "temperature" => Endpoint::Temperature,
        "humidity" => Endpoint::Humidity,
        _ => Endpoint::Data,
    }
}

/// Fields to display for a payload grammar, in schema order.
fn display_fields(kind: PayloadKind) -> Vec<Field> {
    let schema = match kind {
        PayloadKind::Flat(schema) | PayloadKind::Snapshot(schema) => schema,
        PayloadKind::History { schema, .. } => schema,
    };
    schema.fields().iter().map(|spec| spec.field).collect()
}

pub async fn cmd_watch(config: &Config, args: WatchArgs) -> Result<()> {
    let url = args.url.unwrap_or_else(|| config.url.clone());
    let layout = args.layout.unwrap_or_else(|| config.layout.clone());
    let interval = args.interval_ms.unwrap_or(config.snapshot_period_ms);

    let kind = payload_kind(&layout)?;
    let endpoint = endpoint_for(&layout);
    let fields = display_fields(kind);

    let client = FeedClient::new(&url)?;
    let options = PollOptions::with_period(Duration::from_millis(interval));
    options.validate()?;

    if config.no_color {
        eprintln!("Watching: {}{}", url, endpoint.path());
    } else {
        eprintln!("Watching: {}{}", url.cyan(), endpoint.path().cyan());
    }
    if args.count > 0 {
        eprintln!(
            "Interval: {}ms | Count: {} | Press Ctrl+C to stop",
            interval, args.count
        );
    } else {
        eprintln!("Interval: {}ms | Press Ctrl+C to stop", interval);
    }
    eprintln!("{}", "-".repeat(50));

    let mut renderer = SnapshotRenderer::new(
        TermDisplay::new(config.rooms.clone(), config.no_color),
        fields.clone(),
    );
    let mut poller = FeedPoller::spawn(client, endpoint, kind, options);
    let mut cycles: u32 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            cycle = poller.recv() => {
                let Some(cycle) = cycle else { break };
                match args.format {
                    OutputFormat::Json => {
                        let line = serde_json::json!({
                            "seq": cycle.seq,
                            "received_at_ms": cycle.received_at_ms,
                            "rooms": cycle.payload.latest(),
                        });
                        println!("{line}");
                    }
                    OutputFormat::Text => {
                        renderer.render_all(&cycle.payload.latest());
                        let age_ms = unix_millis() - cycle.received_at_ms;
                        tracing::debug!(seq = cycle.seq, age_ms, "rendered cycle");
                        print!("{}", renderer.target().render(&fields));
                    }
                }
                cycles += 1;
                if args.count > 0 && cycles >= args.count {
                    eprintln!("Completed {} cycles.", cycles);
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_map_to_their_endpoints() {
        assert_eq!(endpoint_for("snapshot"), Endpoint::Data);
        assert_eq!(endpoint_for("flat-bme680"), Endpoint::Data);
        assert_eq!(endpoint_for("history"), Endpoint::AllData);
        assert_eq!(endpoint_for("humidity"), Endpoint::Humidity);
    }

    #[test]
    fn display_fields_follow_schema_order() {
        let fields = display_fields(payload_kind("snapshot").unwrap());
        assert_eq!(fields[0], Field::EntityId);
        assert_eq!(fields[1], Field::Timestamp);
        assert!(fields.contains(&Field::GasResistance));
    }
}

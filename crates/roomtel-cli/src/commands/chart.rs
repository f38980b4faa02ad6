//! Chart command implementation.
//!
//! Polls the history feed (or a scalar feed with `--scalar`) and redraws a
//! sparkline per room after every cycle. The first history cycle bulk-loads
//! the window; later cycles append only the newest sample, shifting the
//! oldest point out once the window is full.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use roomtel_core::{
    Endpoint, FeedClient, FeedPoller, MetricSeries, PollOptions, RollingBuffer, SeriesRenderer,
};
use roomtel_types::{Field, HistoryFraming, PayloadKind, schema};

use crate::config::Config;
use crate::term::TermChart;

/// Arguments for the chart command.
pub struct ChartArgs {
    pub url: Option<String>,
    pub metric: String,
    pub interval_ms: Option<u64>,
    pub count: u32,
    pub scalar: bool,
    pub window: Option<usize>,
}

/// The scalar endpoint serving a metric, if the node exposes one.
fn scalar_feed(field: Field) -> Option<(Endpoint, PayloadKind)> {
    match field {
        Field::Temperature => Some((
            Endpoint::Temperature,
            PayloadKind::Flat(&schema::SCALAR_TEMPERATURE),
        )),
        Field::Humidity => Some((
            Endpoint::Humidity,
            PayloadKind::Flat(&schema::SCALAR_HUMIDITY),
        )),
        _ => None,
    }
}

pub async fn cmd_chart(config: &Config, args: ChartArgs) -> Result<()> {
    let url = args.url.unwrap_or_else(|| config.url.clone());
    let window = args.window.unwrap_or(config.window);
    let field = Field::from_key(&args.metric)
        .with_context(|| format!("unknown metric '{}'", args.metric))?;
    if !field.is_numeric() {
        bail!("metric '{}' is not chartable", args.metric);
    }

    let (endpoint, kind) = if args.scalar {
        let Some(feed) = scalar_feed(field) else {
            bail!("no scalar feed for metric '{}'", args.metric);
        };
        feed
    } else {
        (
            Endpoint::AllData,
            PayloadKind::History {
                schema: &schema::HISTORY_TUPLE,
                framing: HistoryFraming::EntityLines,
            },
        )
    };
    let interval = args.interval_ms.unwrap_or(if args.scalar {
        config.scalar_period_ms
    } else {
        config.chart_period_ms
    });

    // A scalar feed carries a single unlabeled room.
    let rooms: Vec<String> = if args.scalar {
        vec![field.key().to_string()]
    } else {
        config.rooms.clone()
    };

    let client = FeedClient::new(&url)?;
    let options = PollOptions::with_period(Duration::from_millis(interval));
    options.validate()?;

    if config.no_color {
        eprintln!("Charting {} from {}{}", field, url, endpoint.path());
    } else {
        eprintln!(
            "Charting {} from {}{}",
            field.green(),
            url.cyan(),
            endpoint.path().cyan()
        );
    }
    eprintln!(
        "Interval: {}ms | Window: {} | Press Ctrl+C to stop",
        interval, window
    );
    eprintln!("{}", "-".repeat(50));

    let mut renderers: Vec<SeriesRenderer<TermChart>> = rooms
        .iter()
        .enumerate()
        .map(|(entity, room)| {
            SeriesRenderer::new(
                entity,
                vec![MetricSeries::new(
                    field,
                    RollingBuffer::with_window(window),
                    TermChart::new(room.clone(), config.no_color),
                )],
            )
        })
        .collect();

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
                for renderer in &mut renderers {
                    renderer.apply(&cycle.payload, cycle.received_at_ms);
                }
                for renderer in &renderers {
                    println!("{}", renderer.series()[0].chart().render());
                }
                println!();
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

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod term;

use commands::{ChartArgs, DemoArgs, OutputFormat, WatchArgs, cmd_chart, cmd_demo, cmd_watch};
use config::Config;

#[derive(Parser)]
#[command(name = "roomtel")]
#[command(author, version, about = "Dashboard for room telemetry sensor nodes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the snapshot feed and print current room values
    Watch {
        /// Base URL of the sensor node
        #[arg(short, long, env = "ROOMTEL_URL")]
        url: Option<String>,

        /// Feed layout (flat-bme280, flat-bme680, snapshot, history, temperature, humidity)
        #[arg(short, long)]
        layout: Option<String>,

        /// Poll interval in milliseconds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Number of cycles to run (0 for unlimited)
        #[arg(short, long, default_value = "0")]
        count: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Poll the history feed and draw per-room sparklines
    Chart {
        /// Base URL of the sensor node
        #[arg(short, long, env = "ROOMTEL_URL")]
        url: Option<String>,

        /// Metric to chart (temperature, humidity, pressure, ...)
        #[arg(short, long, default_value = "temperature")]
        metric: String,

        /// Poll interval in milliseconds
        #[arg(short, long)]
        interval: Option<u64>,

        /// Number of cycles to run (0 for unlimited)
        #[arg(short, long, default_value = "0")]
        count: u32,

        /// Use the single-value scalar feed instead of history
        #[arg(long)]
        scalar: bool,

        /// Rolling chart window in points
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Run the dashboard against a simulated feed (no hardware needed)
    Demo {
        /// Tick interval in milliseconds
        #[arg(short, long, default_value = "1000")]
        interval: u64,

        /// Number of cycles to run (0 for unlimited)
        #[arg(short, long, default_value = "0")]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load();
    if cli.no_color {
        config.no_color = true;
    }

    match cli.command {
        Commands::Watch {
            url,
            layout,
            interval,
            count,
            format,
        } => {
            cmd_watch(
                &config,
                WatchArgs {
                    url,
                    layout,
                    interval_ms: interval,
                    count,
                    format,
                },
            )
            .await
        }
        Commands::Chart {
            url,
            metric,
            interval,
            count,
            scalar,
            window,
        } => {
            cmd_chart(
                &config,
                ChartArgs {
                    url,
                    metric,
                    interval_ms: interval,
                    count,
                    scalar,
                    window,
                },
            )
            .await
        }
        Commands::Demo { interval, count } => {
            cmd_demo(
                &config,
                DemoArgs {
                    interval_ms: interval,
                    count,
                },
            )
            .await
        }
    }
}

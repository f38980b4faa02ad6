//! Command implementations.

mod chart;
mod demo;
mod watch;

pub use chart::{ChartArgs, cmd_chart};
pub use demo::{DemoArgs, cmd_demo};
pub use watch::{WatchArgs, cmd_watch};

use clap::ValueEnum;

/// Output format for machine-readable modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

//! Live-dashboard engine for room telemetry feeds.
//!
//! This crate polls HTTP feeds exposed by embedded sensor nodes, decodes the
//! delimited text bodies, and drives rendering surfaces with the results.
//!
//! # Features
//!
//! - **Feed client**: Validated base URL, fixed request timeout
//! - **Fixed-cadence polling**: Each tick fetches independently; a slow
//!   response never delays the next tick
//! - **Rolling chart buffers**: Bounded windows with eviction signalling
//! - **Snapshot rendering**: Per-room current values and wall-clock time
//! - **Chart pipelines**: Initial bulk load, then incremental appends
//! - **Mock feed**: Simulated rooms for tests and offline demos
//!
//! # Quick Start
//!
//! ```no_run
//! use roomtel_core::{Endpoint, FeedClient, FeedPoller, PollOptions};
//! use roomtel_types::{Payload, PayloadKind, schema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::new("http://192.168.1.50")?;
//!     let kind = PayloadKind::Snapshot(&schema::SNAPSHOT);
//!     let mut poller = FeedPoller::spawn(client, Endpoint::Data, kind, PollOptions::default());
//!
//!     while let Some(cycle) = poller.recv().await {
//!         for reading in cycle.payload.latest().iter().flatten() {
//!             println!("{:?}", reading.entity_id);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod mock;
pub mod poller;
pub mod series;
pub mod snapshot;
pub mod surface;

pub use buffer::{DEFAULT_WINDOW, RollingBuffer};
pub use client::{Endpoint, FeedClient};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use mock::{ChartCall, MockChart, MockDisplay, MockFeed};
pub use poller::{Cycle, FeedPoller, PollOptions, unix_millis};
pub use series::{MetricSeries, SeriesRenderer};
pub use snapshot::{SnapshotRenderer, format_clock};
pub use surface::{ChartSurface, DisplayTarget};

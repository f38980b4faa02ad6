//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use roomtel_core::DEFAULT_WINDOW;
use roomtel_types::{HistoryFraming, PayloadKind, schema};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the sensor node
    #[serde(default = "default_url")]
    pub url: String,

    /// Feed layout of the snapshot endpoint
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Display labels, by entity position
    #[serde(default = "default_rooms")]
    pub rooms: Vec<String>,

    /// Snapshot poll period in milliseconds
    #[serde(default = "default_snapshot_period")]
    pub snapshot_period_ms: u64,

    /// History/chart poll period in milliseconds
    #[serde(default = "default_chart_period")]
    pub chart_period_ms: u64,

    /// Scalar-feed poll period in milliseconds
    #[serde(default = "default_scalar_period")]
    pub scalar_period_ms: u64,

    /// Rolling chart window in points
    #[serde(default = "default_window")]
    pub window: usize,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,
}

fn default_url() -> String {
    "http://192.168.1.50".to_string()
}

fn default_layout() -> String {
    "snapshot".to_string()
}

fn default_rooms() -> Vec<String> {
    vec!["living_room".to_string(), "bedroom".to_string()]
}

fn default_snapshot_period() -> u64 {
    1000
}

fn default_chart_period() -> u64 {
    2000
}

fn default_scalar_period() -> u64 {
    3000
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            layout: default_layout(),
            rooms: default_rooms(),
            snapshot_period_ms: default_snapshot_period(),
            chart_period_ms: default_chart_period(),
            scalar_period_ms: default_scalar_period(),
            window: default_window(),
            no_color: false,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roomtel")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve a feed layout name to its payload grammar.
///
/// Layout names match the node firmware variants: flat single-line bodies
/// for single-sensor nodes, `;`-line bodies for multi-room hubs.
pub fn payload_kind(layout: &str) -> Result<PayloadKind> {
    Ok(match layout {
        "flat-bme280" => PayloadKind::Flat(&schema::FLAT_BME280),
        "flat-bme680" => PayloadKind::Flat(&schema::FLAT_BME680),
        "snapshot" => PayloadKind::Snapshot(&schema::SNAPSHOT),
        "history" => PayloadKind::History {
            schema: &schema::HISTORY_TUPLE,
            framing: HistoryFraming::EntityLines,
        },
        "temperature" => PayloadKind::Flat(&schema::SCALAR_TEMPERATURE),
        "humidity" => PayloadKind::Flat(&schema::SCALAR_HUMIDITY),
        other => bail!(
            "unknown layout '{other}' (expected flat-bme280, flat-bme680, snapshot, history, temperature, or humidity)"
        ),
    })
}

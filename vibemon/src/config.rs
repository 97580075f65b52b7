// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use vibemon_link::LinkConfig;

/// The firmware's normal sample interval.
pub const DEFAULT_SAMPLE_PERIOD_MS: u64 = 1000;

/// Settings of the simulated peripheral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Advertised name.
    pub name: String,
    pub period_ms: u64,
    /// Drop the link after this many notifications.
    pub drop_after: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            name: "VibeMon_SIM".to_string(),
            period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            drop_after: None,
        }
    }
}

impl SimulatorConfig {
    /// Sample period, never shorter than one millisecond.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms.max(1))
    }
}

/// Complete monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub link: LinkConfig,
    pub simulator: SimulatorConfig,
    /// Stop after this many applied samples. Runs until interrupted when absent.
    pub samples: Option<u64>,
    /// Entries summarized in the trend line.
    pub trend_window: usize,
}

/// Entries shown by the dashboard's trend chart.
pub const DEFAULT_TREND_WINDOW: usize = 24;

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            simulator: SimulatorConfig::default(),
            samples: None,
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from the embedded TOML file
    ///
    /// # Errors
    ///
    /// Fails only if the embedded document is invalid.
    pub fn load() -> Result<Self, toml::de::Error> {
        let config_str = include_str!("../config.toml");
        toml::from_str(config_str)
    }

    /// Load configuration from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&source)?)
    }
}

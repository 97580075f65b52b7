// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::platform::DiscoveryFilter;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;
use vibemon_core::{
    Channel, Thresholds, SERVICE_UUID, TEMPERATURE_CHARACTERISTIC_UUID,
    VIBRATION_CHARACTERISTIC_UUID,
};

/// Sensor link configuration.
///
/// Every field has a default matching the stock firmware, so an empty TOML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Chooser name filters.
    pub name_prefixes: Vec<String>,
    pub service: Uuid,
    pub temperature_characteristic: Uuid,
    pub vibration_characteristic: Uuid,
    /// Upper bound for each connect/subscribe step. Unbounded when absent.
    pub operation_timeout_ms: Option<u64>,
    pub thresholds: Thresholds,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            name_prefixes: vec!["VibeMon".to_string(), "ESP32".to_string()],
            service: SERVICE_UUID,
            temperature_characteristic: TEMPERATURE_CHARACTERISTIC_UUID,
            vibration_characteristic: VIBRATION_CHARACTERISTIC_UUID,
            operation_timeout_ms: None,
            thresholds: Thresholds::default(),
        }
    }
}

impl LinkConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns the TOML parser's error for malformed documents or invalid UUIDs.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }

    /// Filters handed to the platform chooser.
    #[must_use]
    pub fn discovery_filter(&self) -> DiscoveryFilter {
        DiscoveryFilter {
            name_prefixes: self.name_prefixes.clone(),
            services: vec![self.service],
        }
    }

    #[must_use]
    pub const fn characteristic(&self, channel: Channel) -> Uuid {
        match channel {
            Channel::Temperature => self.temperature_characteristic,
            Channel::Vibration => self.vibration_characteristic,
        }
    }

    /// Which channel a characteristic carries, if any.
    #[must_use]
    pub fn channel_for(&self, characteristic: Uuid) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|channel| self.characteristic(*channel) == characteristic)
    }
}

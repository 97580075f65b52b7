// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Warning and critical bounds for both channels.
///
/// A value below `*_warning` is normal, below `*_critical` a warning, otherwise
/// critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub temperature_warning: f32,
    pub temperature_critical: f32,
    pub vibration_warning: f32,
    pub vibration_critical: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature_warning: 50.0,
            temperature_critical: 70.0,
            vibration_warning: 2.0,
            vibration_critical: 3.5,
        }
    }
}

impl Thresholds {
    #[must_use]
    pub fn temperature_level(&self, celsius: f32) -> AlertLevel {
        classify(celsius, self.temperature_warning, self.temperature_critical)
    }

    #[must_use]
    pub fn vibration_level(&self, g: f32) -> AlertLevel {
        classify(g, self.vibration_warning, self.vibration_critical)
    }
}

fn classify(value: f32, warning: f32, critical: f32) -> AlertLevel {
    if value < warning {
        AlertLevel::Normal
    } else if value < critical {
        AlertLevel::Warning
    } else {
        AlertLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands() {
        let t = Thresholds::default();
        assert_eq!(t.temperature_level(49.9), AlertLevel::Normal);
        assert_eq!(t.temperature_level(50.0), AlertLevel::Warning);
        assert_eq!(t.temperature_level(70.0), AlertLevel::Critical);
        assert_eq!(t.vibration_level(1.99), AlertLevel::Normal);
        assert_eq!(t.vibration_level(3.49), AlertLevel::Warning);
        assert_eq!(t.vibration_level(3.5), AlertLevel::Critical);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(AlertLevel::Normal < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
    }
}

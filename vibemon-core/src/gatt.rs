// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! GATT identifiers of the sensor firmware contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Primary service exposed by the sensor firmware.
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x1234_5678_1234_5678_1234_5678_9abc_def0);

/// Temperature characteristic, °C.
pub const TEMPERATURE_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x1234_5678_1234_5678_1234_5678_9abc_def1);

/// Vibration characteristic, g.
pub const VIBRATION_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x1234_5678_1234_5678_1234_5678_9abc_def2);

/// One of the two measurement channels a peripheral pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Vibration,
}

impl Channel {
    /// Both channels, in subscription order.
    pub const ALL: [Channel; 2] = [Channel::Temperature, Channel::Vibration];

    /// Unit symbol of values on this channel.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Vibration => "g",
        }
    }

    /// Default characteristic identifier for this channel.
    #[must_use]
    pub const fn default_characteristic(self) -> Uuid {
        match self {
            Channel::Temperature => TEMPERATURE_CHARACTERISTIC_UUID,
            Channel::Vibration => VIBRATION_CHARACTERISTIC_UUID,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Temperature => write!(f, "temperature"),
            Channel::Vibration => write!(f, "vibration"),
        }
    }
}

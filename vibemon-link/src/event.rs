// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::LinkConfig;
use crate::platform::{PeripheralId, PlatformEvent};
use vibemon_core::Channel;

/// A platform event that concerns the current session, typed by channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    TemperatureSample(Vec<u8>),
    VibrationSample(Vec<u8>),
    Disconnected,
}

impl LinkEvent {
    /// Classify a raw platform event.
    ///
    /// Events from other peripherals and notifications on characteristics the
    /// configuration does not know are dropped.
    #[must_use]
    pub fn classify(
        event: PlatformEvent,
        current: &PeripheralId,
        config: &LinkConfig,
    ) -> Option<Self> {
        match event {
            PlatformEvent::Notification {
                peripheral,
                characteristic,
                payload,
            } if &peripheral == current => match config.channel_for(characteristic)? {
                Channel::Temperature => Some(Self::TemperatureSample(payload)),
                Channel::Vibration => Some(Self::VibrationSample(payload)),
            },
            PlatformEvent::Disconnected { peripheral } if &peripheral == current => {
                Some(Self::Disconnected)
            }
            _ => None,
        }
    }

    /// The measurement channel a sample event belongs to.
    #[must_use]
    pub const fn channel(&self) -> Option<Channel> {
        match self {
            Self::TemperatureSample(_) => Some(Channel::Temperature),
            Self::VibrationSample(_) => Some(Channel::Vibration),
            Self::Disconnected => None,
        }
    }
}

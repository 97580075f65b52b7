// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::platform::{CharacteristicHandle, PeripheralId, PeripheralInfo};
use vibemon_core::Channel;

/// Name shown for peripherals that do not advertise one.
pub const UNNAMED_PERIPHERAL: &str = "ESP32 Device";

/// One logical connection to a peripheral.
///
/// Created when a peripheral is selected, dropped on disconnect. Owns the
/// characteristic handles of both measurement subscriptions once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSession {
    peripheral: PeripheralInfo,
    connected: bool,
    temperature: Option<CharacteristicHandle>,
    vibration: Option<CharacteristicHandle>,
}

impl SensorSession {
    #[must_use]
    pub fn new(peripheral: PeripheralInfo) -> Self {
        Self {
            peripheral,
            connected: false,
            temperature: None,
            vibration: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PeripheralId {
        &self.peripheral.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.peripheral.name.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(UNNAMED_PERIPHERAL)
    }

    #[must_use]
    pub fn peripheral(&self) -> &PeripheralInfo {
        &self.peripheral
    }

    /// Whether the underlying link is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether both subscriptions are in place.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.temperature.is_some() && self.vibration.is_some()
    }

    #[must_use]
    pub const fn characteristic(&self, channel: Channel) -> Option<&CharacteristicHandle> {
        match channel {
            Channel::Temperature => self.temperature.as_ref(),
            Channel::Vibration => self.vibration.as_ref(),
        }
    }

    /// Resolved handles, in channel order.
    pub fn characteristics(&self) -> impl Iterator<Item = (Channel, &CharacteristicHandle)> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.characteristic(channel).map(|handle| (channel, handle)))
    }

    pub(crate) fn mark_connected(&mut self) {
        self.connected = true;
    }

    pub(crate) fn attach(&mut self, channel: Channel, handle: CharacteristicHandle) {
        match channel {
            Channel::Temperature => self.temperature = Some(handle),
            Channel::Vibration => self.vibration = Some(handle),
        }
    }
}

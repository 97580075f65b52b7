// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use vibemon_link::PeripheralInfo;

/// The stock firmware's advertisement.
#[must_use]
pub fn sensor_peripheral() -> PeripheralInfo {
    PeripheralInfo::new("AA:BB:CC:00:00:01", Some("VibeMon_01"))
}

/// A board flashed before the firmware set an advertised name.
#[must_use]
pub fn esp32_peripheral() -> PeripheralInfo {
    PeripheralInfo::new("AA:BB:CC:00:00:02", Some("ESP32_DevKit"))
}

/// A peripheral that does not advertise a name at all.
#[must_use]
pub fn unnamed_peripheral() -> PeripheralInfo {
    PeripheralInfo::new("AA:BB:CC:00:00:03", None)
}

/// Some unrelated device in range.
#[must_use]
pub fn foreign_peripheral() -> PeripheralInfo {
    PeripheralInfo::new("11:22:33:44:55:66", Some("Headphones"))
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Client-side link manager for VibeMon temperature/vibration sensors.
//!
//! A [`SensorLink`] discovers one peripheral through an injected
//! [`WirelessPlatform`], connects to it, subscribes to the temperature and vibration
//! characteristics, and merges incoming notifications into the latest
//! [`Measurement`](vibemon_core::Measurement) and a bounded history.
//!
//! # Feature flags
//!
//! - `tracing` (default): log through `tracing`. Without it warnings go to stderr.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;

pub mod config;
pub mod event;
pub mod link;
pub mod platform;
pub mod session;
pub mod snapshot;

pub use self::config::LinkConfig;
pub use self::event::LinkEvent;
pub use self::link::SensorLink;
pub use self::platform::{
    CharacteristicHandle, DiscoveryFilter, PeripheralId, PeripheralInfo, PlatformEvent,
    ServiceHandle, WirelessPlatform,
};
pub use self::session::{SensorSession, UNNAMED_PERIPHERAL};
pub use self::snapshot::LinkSnapshot;

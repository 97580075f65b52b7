// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # VibeMon
//!
//! Client-side link to VibeMon temperature/vibration sensors.
//!
//! ## Overview
//!
//! A sensor peripheral exposes one service with two notifying characteristics,
//! temperature (°C) and vibration (g), each pushing a little-endian `f32`. The
//! [`SensorLink`] discovers the peripheral, connects, subscribes to both, and
//! merges the independent notifications into the latest [`Measurement`] and a
//! bounded [`MeasurementHistory`].
//!
//! The radio is abstracted behind [`WirelessPlatform`]. This crate ships a
//! [`SimulatedPlatform`] and the `vibemon-monitor` console binary; tests use the
//! scripted fake from `vibemon-test-utils`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vibemon::{LinkConfig, SensorLink, SimulatedPlatform, SimulatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let platform = Arc::new(SimulatedPlatform::new(SimulatorConfig::default()));
//!     let mut link = SensorLink::new(platform, LinkConfig::default());
//!
//!     link.connect_and_stream().await?;
//!     while let Some(_event) = link.next_event().await {
//!         if let Some(latest) = link.latest() {
//!             println!("{latest:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - `vibemon-core` - value types, payload codec, history, states, thresholds
//! - `vibemon-error` - error types
//! - `vibemon-link` - platform trait and the link state machine
//! - `vibemon` - this facade, the simulator and the monitor

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod config;
pub mod monitor;
pub mod report;
pub mod simulator;
pub mod task;

pub use self::config::{MonitorConfig, SimulatorConfig};
pub use self::monitor::{Monitor, OutputFormat, RunSummary, StopReason};
pub use self::report::{ChannelStats, SnapshotReport, TrendSummary};
pub use self::simulator::SimulatedPlatform;
pub use self::task::BackgroundTask;

// Re-export the link layer
pub use vibemon_core::{
    AlertLevel, CancellationToken, Channel, LinkState, Measurement, MeasurementHistory, Thresholds,
};
pub use vibemon_error::{ConnectFailure, LinkError, PlatformError, Result};
pub use vibemon_link::{
    LinkConfig, LinkEvent, LinkSnapshot, PeripheralInfo, SensorLink, SensorSession,
    WirelessPlatform,
};

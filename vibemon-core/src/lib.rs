// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core value types for the VibeMon sensor link.
//!
//! Everything in this crate is free of platform and runtime concerns: the GATT
//! identifiers and wire codec, the merged [`Measurement`] and its bounded
//! [`MeasurementHistory`], the [`LinkState`] machine states, alert
//! [`Thresholds`], plus the small async primitives ([`CancellationToken`],
//! [`SnapshotSubject`]) the link manager is built on.
pub mod alert;
pub mod cancellation_token;
pub mod gatt;
pub mod history;
pub mod measurement;
pub mod payload;
pub mod state;
pub mod subject;
pub mod subject_error;

pub use self::alert::{AlertLevel, Thresholds};
pub use self::cancellation_token::CancellationToken;
pub use self::gatt::{
    Channel, SERVICE_UUID, TEMPERATURE_CHARACTERISTIC_UUID, VIBRATION_CHARACTERISTIC_UUID,
};
pub use self::history::{MeasurementHistory, HISTORY_CAPACITY};
pub use self::measurement::Measurement;
pub use self::payload::{decode_sample, encode_sample, SAMPLE_LEN};
pub use self::state::LinkState;
pub use self::subject::SnapshotSubject;
pub use self::subject_error::SubjectError;
pub use vibemon_error::{ConnectFailure, LinkError, PlatformError, Result};

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the VibeMon sensor link.
//!
//! For use in development and testing only, not for production code.
//!
//! # Key Types
//!
//! ## `FakePlatform`
//!
//! A scripted [`WirelessPlatform`](vibemon_link::WirelessPlatform): failures are
//! configured up front, notifications and link drops are pushed during the test,
//! and every primitive call is recorded.
//!
//! ```rust
//! use vibemon_error::PlatformError;
//! use vibemon_test_utils::{Call, FakePlatform};
//!
//! let platform = FakePlatform::new().failing_connect(PlatformError::not_found("gone"));
//! assert!(platform.calls().is_empty());
//! ```
//!
//! ## Assertion helpers
//!
//! ```rust
//! use vibemon_test_utils::assert_no_element_emitted;
//! use futures::stream;
//!
//! # async fn example() {
//! let mut empty = stream::pending::<i32>();
//! assert_no_element_emitted(&mut empty, 10).await;
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `fake_platform` - `FakePlatform` and the recorded `Call`s
//! - `fixtures` - Pre-defined peripherals
//! - `helpers` - Assertion and setup functions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fake_platform;
pub mod fixtures;
pub mod helpers;

pub use fake_platform::{Call, FakePlatform};
pub use fixtures::{esp32_peripheral, foreign_peripheral, sensor_peripheral, unnamed_peripheral};
pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, next_snapshot_where, streaming_link,
    streaming_link_with, unwrap_stream,
};

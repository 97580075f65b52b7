// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the sensor link.
///
/// ```text
/// Idle → Discovering → Connecting → Subscribing → Streaming → (Disconnected | Error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    #[default]
    Idle,
    Discovering,
    Connecting,
    Subscribing,
    Streaming,
    Disconnected,
    Error,
}

impl LinkState {
    /// Returns `true` when a user disconnect has something to tear down.
    #[must_use]
    pub const fn can_disconnect(self) -> bool {
        matches!(
            self,
            LinkState::Connecting | LinkState::Subscribing | LinkState::Streaming | LinkState::Error
        )
    }

    /// Returns `true` when incoming samples are applied.
    #[must_use]
    pub const fn accepts_samples(self) -> bool {
        matches!(self, LinkState::Subscribing | LinkState::Streaming)
    }

    /// Returns `true` when a fresh discovery may start.
    #[must_use]
    pub const fn is_at_rest(self) -> bool {
        matches!(self, LinkState::Idle | LinkState::Disconnected)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LinkState::Idle => "idle",
            LinkState::Discovering => "discovering",
            LinkState::Connecting => "connecting",
            LinkState::Subscribing => "subscribing",
            LinkState::Streaming => "streaming",
            LinkState::Disconnected => "disconnected",
            LinkState::Error => "in error",
        };
        f.write_str(label)
    }
}

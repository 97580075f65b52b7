// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::Serialize;
use vibemon_core::{LinkState, Measurement};

/// Read-only copy of what the UI renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSnapshot {
    pub state: LinkState,
    /// Display name of the session's peripheral.
    pub peripheral: Option<String>,
    pub latest: Option<Measurement>,
    pub history_len: usize,
    pub last_error: Option<String>,
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Errors of the snapshot broadcaster's lifecycle.
///
/// Kept apart from [`crate::LinkError`]: a closed observer channel never affects
/// the link itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    /// The subject has been closed and accepts neither values nor subscribers.
    Closed,
}

impl fmt::Display for SubjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Snapshot subject is closed"),
        }
    }
}

impl std::error::Error for SubjectError {}

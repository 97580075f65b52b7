// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the VibeMon sensor link.
//!
//! Two layers of errors exist:
//!
//! - [`PlatformError`] is what a wireless platform implementation reports when one of
//!   its primitive operations (chooser, connect, resolve, notify, read) fails.
//! - [`LinkError`] is what the sensor link manager surfaces to its caller. Every
//!   variant renders a message suitable for showing to the user verbatim.
//!
//! # Examples
//!
//! ```
//! use vibemon_error::{ConnectFailure, LinkError, Result};
//!
//! fn open() -> Result<()> {
//!     Err(LinkError::connection_failed(ConnectFailure::NotFound))
//! }
//!
//! let err = open().unwrap_err();
//! assert!(err.to_string().starts_with("Connection failed"));
//! ```

use std::time::Duration;

/// Root error type for all sensor link operations.
///
/// All errors are terminal for the attempt that produced them. None of them is
/// retried automatically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    /// The platform does not provide the wireless API at all.
    ///
    /// Permanent for the environment the application runs in.
    #[error("Wireless sensor support is not available on this platform")]
    CapabilityUnavailable,

    /// The user dismissed the device chooser.
    #[error("Device selection was cancelled")]
    DiscoveryCancelled,

    /// The peripheral could not be reached or opened.
    #[error("Connection failed: {cause}")]
    ConnectionFailed {
        /// Why the connection attempt failed
        cause: ConnectFailure,
    },

    /// Service or characteristic resolution, or notification enablement, failed.
    ///
    /// This usually means the peripheral firmware does not match the expected
    /// identifiers. The underlying connection is left open.
    #[error("Subscription failed while {step}: {reason}")]
    SubscriptionFailed {
        /// The step that failed, e.g. "resolving service"
        step: String,
        /// Platform-provided reason
        reason: String,
    },

    /// The peripheral dropped the link.
    ///
    /// This is a lifecycle event rather than the failure of an in-flight call.
    #[error("Peripheral disconnected")]
    PeripheralDisconnected,

    /// A session is already open; disconnect first.
    #[error("Already connected to {peripheral}")]
    AlreadyConnected {
        /// Display name of the connected peripheral
        peripheral: String,
    },

    /// An operation was invoked in a state that does not allow it.
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        /// The rejected operation
        operation: String,
        /// The state the manager was in
        state: String,
    },

    /// A notification payload did not carry exactly one 32-bit float.
    #[error("Malformed sample payload: expected 4 bytes, got {len}")]
    MalformedPayload {
        /// Actual payload length
        len: usize,
    },

    /// A notification decoded to NaN or infinity.
    #[error("Sample value is not a finite number")]
    NonFiniteSample,
}

/// Cause carried by [`LinkError::ConnectionFailed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectFailure {
    /// No matching peripheral was found or it went out of reach.
    #[error("Device not found. Make sure the sensor is powered on and nearby.")]
    NotFound,

    /// The platform refused access to the wireless API.
    #[error("Bluetooth access is blocked. Allow access in the platform settings.")]
    PermissionDenied,

    /// The configured operation timeout expired.
    #[error("No response from the device after {0:?}")]
    Timeout(Duration),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Errors reported by a wireless platform implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The wireless API is missing.
    #[error("wireless API unsupported")]
    Unsupported,

    /// The user dismissed the chooser.
    #[error("chooser cancelled by user")]
    Cancelled,

    /// A peripheral, service or characteristic does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The platform denied access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Generic transport failure.
    #[error("{0}")]
    Failure(String),
}

impl PlatformError {
    /// Create a generic failure
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<PlatformError> for ConnectFailure {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::NotFound(_) => Self::NotFound,
            PlatformError::PermissionDenied(_) => Self::PermissionDenied,
            PlatformError::Unsupported | PlatformError::Cancelled => Self::Other(error.to_string()),
            PlatformError::Failure(message) => Self::Other(message),
        }
    }
}

impl LinkError {
    /// Create a connection failure with the given cause
    #[must_use]
    pub fn connection_failed(cause: impl Into<ConnectFailure>) -> Self {
        Self::ConnectionFailed {
            cause: cause.into(),
        }
    }

    /// Create a subscription failure for the given step
    pub fn subscription_failed(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SubscriptionFailed {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(operation: impl Into<String>, state: impl ToString) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            state: state.to_string(),
        }
    }

    /// Create an already-connected error
    pub fn already_connected(peripheral: impl Into<String>) -> Self {
        Self::AlreadyConnected {
            peripheral: peripheral.into(),
        }
    }

    /// Map the result of the platform's device chooser.
    ///
    /// Cancellation and a missing API get their own variants; anything else is a
    /// connection failure.
    #[must_use]
    pub fn from_discovery(error: PlatformError) -> Self {
        match error {
            PlatformError::Cancelled => Self::DiscoveryCancelled,
            PlatformError::Unsupported => Self::CapabilityUnavailable,
            other => Self::connection_failed(other),
        }
    }

    /// Returns `true` for conditions the user caused on purpose.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::DiscoveryCancelled)
    }

    /// Returns `true` if retrying in the same environment cannot succeed.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable)
    }
}

/// Specialized Result type for sensor link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Wire codec for characteristic payloads.
//!
//! Each notification carries exactly one IEEE-754 single-precision float in
//! little-endian byte order. There is no envelope, sequence number or unit marker.

use vibemon_error::{LinkError, Result};

/// Length of a sample payload in bytes.
pub const SAMPLE_LEN: usize = 4;

/// Decode one sample from a characteristic payload.
///
/// # Errors
///
/// Returns [`LinkError::MalformedPayload`] unless the payload is exactly
/// [`SAMPLE_LEN`] bytes, and [`LinkError::NonFiniteSample`] for NaN or infinity.
///
/// # Examples
///
/// ```
/// use vibemon_core::decode_sample;
///
/// assert_eq!(decode_sample(&42.5f32.to_le_bytes()).unwrap(), 42.5);
/// assert!(decode_sample(&[0, 0]).is_err());
/// ```
pub fn decode_sample(payload: &[u8]) -> Result<f32> {
    let bytes: [u8; SAMPLE_LEN] = payload
        .try_into()
        .map_err(|_| LinkError::MalformedPayload { len: payload.len() })?;

    let value = f32::from_le_bytes(bytes);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LinkError::NonFiniteSample)
    }
}

/// Encode a sample the way the peripheral firmware does.
#[must_use]
pub fn encode_sample(value: f32) -> [u8; SAMPLE_LEN] {
    value.to_le_bytes()
}

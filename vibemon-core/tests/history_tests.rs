// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::{Duration, TimeZone, Utc};
use vibemon_core::{Channel, Measurement, MeasurementHistory, HISTORY_CAPACITY};

fn sample(i: usize) -> Measurement {
    let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(i as i64);
    Measurement::from_sample(Channel::Temperature, i as f32, at)
}

#[test]
fn test_history_starts_empty() {
    let history = MeasurementHistory::new();
    assert!(history.is_empty());
    assert_eq!(history.latest(), None);
}

#[test]
fn test_history_keeps_insertion_order() {
    // Arrange
    let mut history = MeasurementHistory::new();

    // Act
    for i in 0..3 {
        history.push(sample(i));
    }

    // Assert
    let values: Vec<_> = history.iter().map(|m| m.temperature).collect();
    assert_eq!(values, vec![Some(0.0), Some(1.0), Some(2.0)]);
    assert_eq!(history.latest().and_then(|m| m.temperature), Some(2.0));
}

#[test]
fn test_history_evicts_oldest_after_capacity() {
    // Arrange
    let mut history = MeasurementHistory::new();
    for i in 0..HISTORY_CAPACITY {
        assert_eq!(history.push(sample(i)), None);
    }
    assert_eq!(history.len(), HISTORY_CAPACITY);

    // Act
    let evicted = history.push(sample(HISTORY_CAPACITY));

    // Assert
    assert_eq!(evicted, Some(sample(0)));
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.oldest(), Some(&sample(1)));
    assert_eq!(history.latest(), Some(&sample(HISTORY_CAPACITY)));
}

#[test]
fn test_history_never_exceeds_capacity() {
    let mut history = MeasurementHistory::new();
    for i in 0..(HISTORY_CAPACITY * 3 + 7) {
        history.push(sample(i));
        assert!(history.len() <= HISTORY_CAPACITY);
    }
}

#[test]
fn test_recent_window() {
    // Arrange
    let mut history = MeasurementHistory::new();
    for i in 0..30 {
        history.push(sample(i));
    }

    // Act
    let window: Vec<_> = history.recent(24).collect();

    // Assert
    assert_eq!(window.len(), 24);
    assert_eq!(window[0], &sample(6));
    assert_eq!(window[23], &sample(29));
}

#[test]
fn test_recent_window_larger_than_history() {
    let mut history = MeasurementHistory::new();
    history.push(sample(0));
    history.push(sample(1));

    assert_eq!(history.recent(24).count(), 2);
}

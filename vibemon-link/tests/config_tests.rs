// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use uuid::Uuid;
use vibemon_core::{Channel, SERVICE_UUID, TEMPERATURE_CHARACTERISTIC_UUID};
use vibemon_link::{LinkConfig, LinkEvent, PeripheralId, PlatformEvent};

#[test]
fn test_empty_document_yields_defaults() -> anyhow::Result<()> {
    // Act
    let config = LinkConfig::from_toml_str("")?;

    // Assert
    assert_eq!(config, LinkConfig::default());
    assert_eq!(config.name_prefixes, vec!["VibeMon", "ESP32"]);
    assert_eq!(config.service, SERVICE_UUID);
    assert_eq!(config.operation_timeout(), None);
    Ok(())
}

#[test]
fn test_overrides_are_applied() -> anyhow::Result<()> {
    // Arrange
    let source = r#"
        name_prefixes = ["Bench"]
        vibration_characteristic = "00000000-0000-0000-0000-0000000000aa"
        operation_timeout_ms = 2500

        [thresholds]
        temperature_warning = 40.0
    "#;

    // Act
    let config = LinkConfig::from_toml_str(source)?;

    // Assert
    assert_eq!(config.name_prefixes, vec!["Bench"]);
    assert_eq!(
        config.characteristic(Channel::Vibration),
        Uuid::from_u128(0xaa)
    );
    assert_eq!(
        config.characteristic(Channel::Temperature),
        TEMPERATURE_CHARACTERISTIC_UUID
    );
    assert_eq!(config.operation_timeout(), Some(Duration::from_millis(2500)));
    assert_eq!(config.thresholds.temperature_warning, 40.0);
    assert_eq!(config.thresholds.temperature_critical, 70.0);
    Ok(())
}

#[test]
fn test_invalid_uuid_is_rejected() {
    let result = LinkConfig::from_toml_str(r#"service = "not-a-uuid""#);
    assert!(result.is_err());
}

#[test]
fn test_discovery_filter_matches_prefix_or_service() {
    // Arrange
    let filter = LinkConfig::default().discovery_filter();

    // Assert
    assert!(filter.matches(Some("VibeMon_02"), &[]));
    assert!(filter.matches(Some("ESP32_Bench"), &[]));
    assert!(filter.matches(None, &[SERVICE_UUID]));
    assert!(!filter.matches(Some("Headphones"), &[Uuid::nil()]));
    assert!(!filter.matches(None, &[]));
}

#[test]
fn test_channel_for_characteristic() {
    let config = LinkConfig::default();

    assert_eq!(
        config.channel_for(TEMPERATURE_CHARACTERISTIC_UUID),
        Some(Channel::Temperature)
    );
    assert_eq!(config.channel_for(Uuid::nil()), None);
}

#[test]
fn test_classify_routes_by_characteristic() {
    // Arrange
    let config = LinkConfig::default();
    let current = PeripheralId::new("AA");
    let notification = |peripheral: &str, characteristic| PlatformEvent::Notification {
        peripheral: PeripheralId::new(peripheral),
        characteristic,
        payload: vec![0; 4],
    };

    // Assert
    assert_eq!(
        LinkEvent::classify(
            notification("AA", config.vibration_characteristic),
            &current,
            &config
        ),
        Some(LinkEvent::VibrationSample(vec![0; 4]))
    );
    assert_eq!(
        LinkEvent::classify(
            notification("BB", config.temperature_characteristic),
            &current,
            &config
        ),
        None
    );
    assert_eq!(
        LinkEvent::classify(
            PlatformEvent::Disconnected {
                peripheral: current.clone()
            },
            &current,
            &config
        ),
        Some(LinkEvent::Disconnected)
    );
}

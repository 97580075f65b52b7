// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use uuid::Uuid;
use vibemon::{
    CancellationToken, ConnectFailure, LinkConfig, LinkError, LinkState, SensorLink,
    SimulatedPlatform, SimulatorConfig,
};

fn fast(drop_after: Option<u64>) -> SimulatorConfig {
    SimulatorConfig {
        period_ms: 10,
        drop_after,
        ..SimulatorConfig::default()
    }
}

#[tokio::test]
async fn test_simulator_streams_readings_in_range() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(SimulatedPlatform::new(fast(None)));
    let mut link = SensorLink::new(platform, LinkConfig::default());
    link.connect_and_stream().await?;

    // Act
    for _ in 0..6 {
        timeout(Duration::from_secs(2), link.next_event())
            .await?
            .expect("simulator event");
    }

    // Assert
    let latest = link.latest().expect("latest");
    let temperature = latest.temperature.expect("temperature");
    let vibration = latest.vibration.expect("vibration");
    assert!((42.0..50.0).contains(&temperature));
    assert!((1.0..1.5).contains(&vibration));
    assert_eq!(link.history().len(), 6);
    assert_eq!(
        link.session().map(|s| s.display_name().to_string()),
        Some("VibeMon_SIM".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_simulator_drops_link_after_limit() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(SimulatedPlatform::new(fast(Some(4))));
    let mut link = SensorLink::new(platform, LinkConfig::default());
    link.connect_and_stream().await?;

    // Act
    let samples = timeout(
        Duration::from_secs(2),
        link.run_until_disconnected(&CancellationToken::new()),
    )
    .await?;

    // Assert
    assert_eq!(samples, 4);
    assert_eq!(link.state(), LinkState::Disconnected);
    assert_eq!(link.latest(), None);
    assert_eq!(link.history().len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_simulator_streams_again_after_dropping_link() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(SimulatedPlatform::new(fast(Some(4))));
    let mut link = SensorLink::new(Arc::clone(&platform), LinkConfig::default());
    link.connect_and_stream().await?;
    timeout(
        Duration::from_secs(2),
        link.run_until_disconnected(&CancellationToken::new()),
    )
    .await?;
    assert_eq!(link.state(), LinkState::Disconnected);

    // Act
    link.connect_and_stream().await?;
    let event = timeout(Duration::from_secs(2), link.next_event()).await?;

    // Assert
    assert!(event.is_some());
    assert_eq!(link.state(), LinkState::Streaming);
    assert_eq!(link.history().len(), 5);
    assert!(platform.sent() > 0);
    Ok(())
}

#[tokio::test]
async fn test_simulator_read_current() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(SimulatedPlatform::new(SimulatorConfig::default()));
    let mut link = SensorLink::new(platform, LinkConfig::default());
    link.connect_and_stream().await?;

    // Act
    let measurement = link.read_current().await?;

    // Assert
    assert!(measurement.is_complete());
    assert!((42.0..50.0).contains(&measurement.temperature.unwrap_or_default()));
    Ok(())
}

#[tokio::test]
async fn test_simulator_stops_producing_after_disconnect() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(SimulatedPlatform::new(fast(None)));
    let mut link = SensorLink::new(Arc::clone(&platform), LinkConfig::default());
    link.connect_and_stream().await?;
    timeout(Duration::from_secs(2), link.next_event()).await?;

    // Act
    link.disconnect().await?;
    let sent = platform.sent();
    sleep(Duration::from_millis(60)).await;

    // Assert
    assert_eq!(platform.sent(), sent);
    assert_eq!(link.state(), LinkState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn test_simulator_is_not_offered_for_foreign_filters() {
    // Arrange
    let platform = Arc::new(SimulatedPlatform::new(SimulatorConfig::default()));
    let config = LinkConfig {
        name_prefixes: vec!["Thermostat".to_string()],
        service: Uuid::nil(),
        ..LinkConfig::default()
    };
    let mut link = SensorLink::new(platform, config);

    // Act
    let result = link.discover().await;

    // Assert
    assert_eq!(
        result,
        Err(LinkError::ConnectionFailed {
            cause: ConnectFailure::NotFound
        })
    );
    assert_eq!(link.state(), LinkState::Idle);
}

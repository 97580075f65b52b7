// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use vibemon::{
    CancellationToken, LinkState, Monitor, MonitorConfig, OutputFormat, StopReason,
};
use vibemon_error::PlatformError;
use vibemon_test_utils::{Call, FakePlatform};

fn limited(samples: u64) -> MonitorConfig {
    MonitorConfig {
        samples: Some(samples),
        ..MonitorConfig::default()
    }
}

fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
async fn test_monitor_stops_at_sample_limit() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(FakePlatform::new());
    platform.push_temperature(45.0);
    platform.push_vibration(1.2);
    platform.push_temperature(46.0);
    let mut monitor = Monitor::new(Arc::clone(&platform), limited(2), OutputFormat::Text);
    let mut out = Vec::new();

    // Act
    let summary = monitor.run(&mut out, &CancellationToken::new()).await?;

    // Assert
    assert_eq!(summary.samples, 2);
    assert_eq!(summary.stopped, StopReason::SampleLimit);
    assert_eq!(summary.trend.entries, 2);
    assert_eq!(monitor.link().state(), LinkState::Disconnected);
    assert_eq!(
        platform.count(|call| matches!(call, Call::Disconnect(_))),
        1
    );

    let output = lines(&out);
    assert_eq!(output.len(), 4);
    assert!(output[0].starts_with("[streaming] VibeMon_01"));
    assert!(output[2].contains("temperature 45.00 °C (normal)"));
    assert!(output[2].contains("vibration 1.20 g (normal)"));
    assert!(output[3].starts_with("summary: 2 samples, sample limit reached"));
    Ok(())
}

#[tokio::test]
async fn test_monitor_reports_peripheral_drop() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(FakePlatform::new());
    platform.push_temperature(72.0);
    platform.drop_link();
    let mut monitor = Monitor::new(
        Arc::clone(&platform),
        MonitorConfig::default(),
        OutputFormat::Text,
    );
    let mut out = Vec::new();

    // Act
    let summary = monitor.run(&mut out, &CancellationToken::new()).await?;

    // Assert
    assert_eq!(summary.samples, 1);
    assert_eq!(summary.stopped, StopReason::PeripheralDisconnected);
    let temperature = summary.trend.temperature.expect("temperature stats");
    assert_eq!(temperature.max, 72.0);
    assert_eq!(temperature.peak_level, vibemon::AlertLevel::Critical);
    assert!(summary.trend.vibration.is_none());

    let output = lines(&out);
    assert!(output[1].contains("(critical)"));
    assert!(output[2].starts_with("[disconnected]"));
    Ok(())
}

#[tokio::test]
async fn test_monitor_stops_on_cancel() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(FakePlatform::new());
    let mut monitor = Monitor::new(platform, MonitorConfig::default(), OutputFormat::Text);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut out = Vec::new();

    // Act
    let summary = monitor.run(&mut out, &cancel).await?;

    // Assert
    assert_eq!(summary.samples, 0);
    assert_eq!(summary.stopped, StopReason::Cancelled);
    assert_eq!(summary.trend.entries, 0);
    Ok(())
}

#[tokio::test]
async fn test_monitor_json_output() -> anyhow::Result<()> {
    // Arrange
    let platform = Arc::new(FakePlatform::new());
    platform.push_vibration(2.5);
    let mut monitor = Monitor::new(platform, limited(1), OutputFormat::Json);
    let mut out = Vec::new();

    // Act
    monitor.run(&mut out, &CancellationToken::new()).await?;

    // Assert
    let values = lines(&out)
        .iter()
        .map(|line| serde_json::from_str::<serde_json::Value>(line))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(values.len(), 3);
    assert_eq!(values[0]["state"], "streaming");
    assert_eq!(values[0]["peripheral"], "VibeMon_01");
    assert_eq!(values[1]["latest"]["vibration"], 2.5);
    assert_eq!(values[1]["vibration_level"], "warning");
    assert_eq!(values[1]["temperature_level"], serde_json::Value::Null);
    assert_eq!(values[2]["stopped"], "sample_limit");
    assert_eq!(values[2]["samples"], 1);
    Ok(())
}

#[tokio::test]
async fn test_monitor_propagates_link_errors() {
    // Arrange
    let platform = Arc::new(FakePlatform::new().failing_connect(PlatformError::failure("radio off")));
    let mut monitor = Monitor::new(platform, MonitorConfig::default(), OutputFormat::Text);
    let mut out = Vec::new();

    // Act
    let result = monitor.run(&mut out, &CancellationToken::new()).await;

    // Assert
    let err = result.expect_err("connect should fail");
    assert_eq!(err.to_string(), "Connection failed: radio off");
    assert!(out.is_empty());
    assert_eq!(monitor.link().state(), LinkState::Idle);
}

#[tokio::test]
async fn test_monitor_closes_link_when_subscription_fails() {
    // Arrange
    let platform = Arc::new(FakePlatform::new().without_service());
    let mut monitor = Monitor::new(
        Arc::clone(&platform),
        MonitorConfig::default(),
        OutputFormat::Text,
    );
    let mut out = Vec::new();

    // Act
    let result = monitor.run(&mut out, &CancellationToken::new()).await;

    // Assert
    let err = result.expect_err("subscription should fail");
    assert!(err.to_string().contains("resolving service"));
    assert!(out.is_empty());
    assert_eq!(monitor.link().state(), LinkState::Disconnected);
    assert_eq!(
        platform.count(|call| matches!(call, Call::Disconnect(_))),
        1
    );
    assert_eq!(platform.connected(), None);
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Console session driver: connect, print every change, summarize on exit.

use crate::config::MonitorConfig;
use crate::report::{SnapshotReport, TrendSummary};
use futures::future::{select, Either};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use vibemon_core::CancellationToken;
use vibemon_link::{LinkEvent, SensorLink, WirelessPlatform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Why a monitoring run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    SampleLimit,
    PeripheralDisconnected,
    Cancelled,
    EventsClosed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopReason::SampleLimit => "sample limit reached",
            StopReason::PeripheralDisconnected => "peripheral disconnected",
            StopReason::Cancelled => "interrupted",
            StopReason::EventsClosed => "platform shut down",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub samples: u64,
    pub stopped: StopReason,
    pub trend: TrendSummary,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples, {}; {}",
            self.samples, self.stopped, self.trend
        )
    }
}

/// Drives one [`SensorLink`] session and writes reports to an output sink.
pub struct Monitor<P: WirelessPlatform> {
    link: SensorLink<P>,
    config: MonitorConfig,
    format: OutputFormat,
}

impl<P: WirelessPlatform> Monitor<P> {
    pub fn new(platform: Arc<P>, config: MonitorConfig, format: OutputFormat) -> Self {
        let link = SensorLink::new(platform, config.link.clone());
        Self {
            link,
            config,
            format,
        }
    }

    #[must_use]
    pub fn link(&self) -> &SensorLink<P> {
        &self.link
    }

    /// Connect, report until a stop condition, then disconnect and summarize.
    ///
    /// # Errors
    ///
    /// Link errors from connecting, and write errors on `out`. A connection left open
    /// by a failed setup is closed before the error is returned.
    pub async fn run<W: Write>(
        &mut self,
        out: &mut W,
        cancel: &CancellationToken,
    ) -> anyhow::Result<RunSummary> {
        let peripheral = match self.link.connect_and_stream().await {
            Ok(peripheral) => peripheral,
            Err(error) => {
                // A failed subscription leaves the connection open.
                if let Err(close) = self.link.disconnect().await {
                    tracing::warn!("closing after failed setup: {close}");
                }
                return Err(error.into());
            }
        };
        tracing::info!(
            "streaming from {}",
            peripheral.name.as_deref().unwrap_or(peripheral.id.as_str())
        );
        self.report(out)?;

        let mut samples = 0_u64;
        let stopped = loop {
            if self.config.samples.is_some_and(|limit| samples >= limit) {
                break StopReason::SampleLimit;
            }

            let step = {
                let next = self.link.next_event();
                futures::pin_mut!(next);
                match select(next, cancel.cancelled()).await {
                    Either::Left((event, _)) => Some(event),
                    Either::Right(_) => None,
                }
            };

            match step {
                None => break StopReason::Cancelled,
                Some(None) => break StopReason::EventsClosed,
                Some(Some(LinkEvent::Disconnected)) => {
                    self.report(out)?;
                    break StopReason::PeripheralDisconnected;
                }
                Some(Some(_)) => {
                    samples += 1;
                    self.report(out)?;
                }
            }
        };

        self.link.disconnect().await?;
        let summary = RunSummary {
            samples,
            stopped,
            trend: TrendSummary::from_history(
                self.link.history(),
                self.config.trend_window,
                &self.config.link.thresholds,
            ),
        };
        self.write_summary(out, &summary)?;
        Ok(summary)
    }

    fn report<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let report = SnapshotReport::new(self.link.snapshot(), &self.config.link.thresholds);
        match self.format {
            OutputFormat::Text => writeln!(out, "{report}")?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, out: &mut W, summary: &RunSummary) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(out, "summary: {summary}")?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(summary)?)?,
        }
        Ok(())
    }
}

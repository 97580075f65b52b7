// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Console monitor for a simulated VibeMon sensor.
//!
//! ```text
//! vibemon-monitor [--json] [config.toml]
//! ```
//!
//! Logs go to stderr (filter with `RUST_LOG`), reports to stdout.

use anyhow::Context;
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibemon::{CancellationToken, Monitor, MonitorConfig, OutputFormat, SimulatedPlatform};

struct Args {
    format: OutputFormat,
    config: Option<PathBuf>,
}

fn usage(program: &str) {
    eprintln!("Usage: {program} [--json] [config.toml]");
    eprintln!("    --json      print one JSON object per snapshot");
    eprintln!("    config.toml monitor configuration (default: embedded)");
}

fn parse_args() -> Result<Args, ()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "vibemon-monitor".to_string());

    let mut parsed = Args {
        format: OutputFormat::Text,
        config: None,
    };
    for arg in args {
        match arg.as_str() {
            "--json" => parsed.format = OutputFormat::Json,
            "-h" | "--help" => {
                usage(&program);
                return Err(());
            }
            flag if flag.starts_with('-') => {
                usage(&program);
                eprintln!("ERROR: unknown option '{flag}'");
                return Err(());
            }
            path if parsed.config.is_none() => parsed.config = Some(PathBuf::from(path)),
            extra => {
                usage(&program);
                eprintln!("ERROR: unexpected argument '{extra}'");
                return Err(());
            }
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from '{}'", path.display())),
        None => MonitorConfig::load().context("embedded configuration is invalid"),
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let platform = Arc::new(SimulatedPlatform::new(config.simulator.clone()));
    let mut monitor = Monitor::new(platform, config, args.format);

    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, shutting down");
            cancel_ctrlc.cancel();
        }
    });

    let summary = monitor.run(&mut io::stdout().lock(), &cancel).await?;
    tracing::info!("monitor stopped: {}", summary.stopped);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let Ok(args) = parse_args() else {
        return ExitCode::FAILURE;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

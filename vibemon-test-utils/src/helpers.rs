// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::FakePlatform;
use futures::stream::StreamExt;
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use vibemon_link::{LinkConfig, LinkSnapshot, SensorLink};

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected item emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Next item of `stream`, panicking on timeout or end of stream.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected item but stream ended"),
        Err(_) => panic!("Timeout: No item received within {timeout_ms} ms"),
    }
}

pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected stream to end but got an item"),
        Err(_) => panic!("Timeout: stream did not end within {timeout_ms} ms"),
    }
}

/// Skip snapshots until one satisfies `predicate`.
pub async fn next_snapshot_where<S>(
    stream: &mut S,
    timeout_ms: u64,
    predicate: impl Fn(&LinkSnapshot) -> bool,
) -> LinkSnapshot
where
    S: Stream<Item = LinkSnapshot> + Unpin,
{
    loop {
        let snapshot = unwrap_stream(stream, timeout_ms).await;
        if predicate(&snapshot) {
            return snapshot;
        }
    }
}

/// A link over `platform` that has already reached `Streaming`.
pub async fn streaming_link(platform: &Arc<FakePlatform>) -> SensorLink<FakePlatform> {
    streaming_link_with(platform, LinkConfig::default()).await
}

pub async fn streaming_link_with(
    platform: &Arc<FakePlatform>,
    config: LinkConfig,
) -> SensorLink<FakePlatform> {
    let mut link = SensorLink::new(Arc::clone(platform), config);
    link.connect_and_stream()
        .await
        .expect("fake platform should stream");
    link
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use vibemon::BackgroundTask;

#[tokio::test]
async fn test_task_stops_when_dropped() -> anyhow::Result<()> {
    // Arrange
    let (done_tx, done_rx) = async_channel::bounded::<()>(1);
    let task = BackgroundTask::spawn(move |cancel| async move {
        cancel.cancelled().await;
        let _ = done_tx.send(()).await;
    });

    // Act
    drop(task);

    // Assert
    timeout(Duration::from_secs(1), done_rx.recv()).await??;
    Ok(())
}

#[tokio::test]
async fn test_task_cancel_is_observable() {
    // Arrange
    let stopped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stopped);
    let task = BackgroundTask::spawn(move |cancel| async move {
        cancel.cancelled().await;
        flag.store(true, Ordering::SeqCst);
    });

    // Act
    task.cancel();
    sleep(Duration::from_millis(20)).await;

    // Assert
    assert!(task.is_cancelled());
    assert!(stopped.load(Ordering::SeqCst));
}

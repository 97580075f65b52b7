// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background task spawning with cooperative cancellation.

use std::future::Future;
use vibemon_core::CancellationToken;

/// Tokio task handle that cancels its task on drop.
///
/// The spawned future receives a [`CancellationToken`] that it should monitor to
/// shut down gracefully. Dropping the handle or calling [`cancel`](Self::cancel)
/// signals the token; the task stops at its next checkpoint.
///
/// # Example
///
/// ```rust
/// use vibemon::BackgroundTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = BackgroundTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct BackgroundTask {
    cancel: CancellationToken,
}

impl BackgroundTask {
    /// Spawn `f` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

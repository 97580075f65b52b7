// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber broadcaster for read-only link snapshots.
//!
//! ## Characteristics
//!
//! - **Hot**: late subscribers only receive snapshots published after subscribing.
//! - **Unbounded**: a slow observer never blocks the link.
//! - **Shared**: cheap to clone; all clones publish to the same subscribers.
//!
//! ## Example
//!
//! ```
//! use vibemon_core::SnapshotSubject;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = SnapshotSubject::<u32>::new();
//! let mut stream = subject.subscribe().unwrap();
//!
//! subject.publish(1).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(1));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::SubjectError;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use parking_lot::Mutex;
use std::sync::Arc;

/// Stream handed to each subscriber.
pub type SnapshotStream<T> = UnboundedReceiver<T>;

struct SubjectState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<T>>,
}

/// Broadcasts each published value to all current subscribers.
pub struct SnapshotSubject<T: Clone + Send + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> SnapshotSubject<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe and receive every value published from now on.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] once the subject has been closed.
    pub fn subscribe(&self) -> Result<SnapshotStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(rx)
    }

    /// Send a value to all active subscribers, pruning dropped ones.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] once the subject has been closed.
    pub fn publish(&self, value: T) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        state
            .senders
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
        Ok(())
    }

    /// Complete all subscriber streams. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of subscribers seen alive at the last publish.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }
}

impl<T: Clone + Send + 'static> Default for SnapshotSubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for SnapshotSubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

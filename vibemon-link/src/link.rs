// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The sensor link state machine.
//!
//! ```text
//! Idle → Discovering → Connecting → Subscribing → Streaming → (Disconnected | Error)
//! ```
//!
//! All commands take `&mut self` and are awaited from a single task. Platform
//! notifications are queued by the platform and applied by the same task through
//! the event pump ([`SensorLink::next_event`], [`SensorLink::drain_pending`],
//! [`SensorLink::run_until_disconnected`]), so a sample update is always an atomic
//! replace of one measurement field.

use crate::config::LinkConfig;
use crate::event::LinkEvent;
use crate::platform::{
    CharacteristicHandle, PeripheralId, PeripheralInfo, PlatformEvent, WirelessPlatform,
};
use crate::session::SensorSession;
use crate::snapshot::LinkSnapshot;
use chrono::Utc;
use futures::future::{select, Either};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use vibemon_core::subject::SnapshotStream;
use vibemon_core::{
    decode_sample, CancellationToken, Channel, LinkState, Measurement, MeasurementHistory,
    SnapshotSubject,
};
use vibemon_error::{ConnectFailure, LinkError, PlatformError, Result};

/// Why a bounded platform call did not succeed.
enum Attempt {
    Failed(PlatformError),
    TimedOut(Duration),
}

impl Attempt {
    fn into_connect_failure(self) -> ConnectFailure {
        match self {
            Attempt::Failed(error) => error.into(),
            Attempt::TimedOut(limit) => ConnectFailure::Timeout(limit),
        }
    }

    fn into_reason(self) -> String {
        match self {
            Attempt::Failed(error) => error.to_string(),
            Attempt::TimedOut(limit) => format!("no response after {limit:?}"),
        }
    }
}

async fn bounded<T, F>(limit: Option<Duration>, call: F) -> std::result::Result<T, Attempt>
where
    F: Future<Output = std::result::Result<T, PlatformError>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(Attempt::Failed),
            Err(_) => Err(Attempt::TimedOut(limit)),
        },
        None => call.await.map_err(Attempt::Failed),
    }
}

/// Manages the single wireless session to a temperature/vibration sensor.
///
/// The UI holds the link, issues commands ([`discover`](Self::discover),
/// [`connect_and_stream`](Self::connect_and_stream), [`disconnect`](Self::disconnect))
/// and renders the read-only state ([`state`](Self::state), [`latest`](Self::latest),
/// [`history`](Self::history), [`last_error`](Self::last_error), or the
/// [`watch`](Self::watch) stream).
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use vibemon_link::{LinkConfig, SensorLink, WirelessPlatform};
/// # async fn example<P: WirelessPlatform>(platform: Arc<P>) -> vibemon_error::Result<()> {
/// let mut link = SensorLink::new(platform, LinkConfig::default());
/// link.connect_and_stream().await?;
///
/// while let Some(event) = link.next_event().await {
///     println!("{event:?} -> {:?}", link.latest());
/// }
/// # Ok(())
/// # }
/// ```
pub struct SensorLink<P: WirelessPlatform> {
    platform: Arc<P>,
    config: LinkConfig,
    events: async_channel::Receiver<PlatformEvent>,
    state: LinkState,
    session: Option<SensorSession>,
    latest: Option<Measurement>,
    history: MeasurementHistory,
    last_error: Option<String>,
    snapshots: SnapshotSubject<LinkSnapshot>,
}

impl<P: WirelessPlatform> SensorLink<P> {
    pub fn new(platform: Arc<P>, config: LinkConfig) -> Self {
        let events = platform.events();
        Self {
            platform,
            config,
            events,
            state: LinkState::Idle,
            session: None,
            latest: None,
            history: MeasurementHistory::new(),
            last_error: None,
            snapshots: SnapshotSubject::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.state
    }

    #[must_use]
    pub const fn session(&self) -> Option<&SensorSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn latest(&self) -> Option<&Measurement> {
        self.latest.as_ref()
    }

    #[must_use]
    pub const fn history(&self) -> &MeasurementHistory {
        &self.history
    }

    /// Message of the most recent failure, cleared when a new discovery starts.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub const fn config(&self) -> &LinkConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            state: self.state,
            peripheral: self
                .session
                .as_ref()
                .map(|session| session.display_name().to_string()),
            latest: self.latest,
            history_len: self.history.len(),
            last_error: self.last_error.clone(),
        }
    }

    /// Stream of snapshots published after every state or data change.
    ///
    /// Only changes made after subscribing are delivered. The stream ends when the
    /// link is dropped.
    pub fn watch(&self) -> SnapshotStream<LinkSnapshot> {
        self.snapshots.subscribe().unwrap_or_else(|_| {
            let (_, closed) = futures::channel::mpsc::unbounded();
            closed
        })
    }

    /// Ask the platform's chooser for a peripheral.
    ///
    /// On success the link is `Connecting` and holds a session for the selected
    /// peripheral; pass the returned description to [`connect`](Self::connect).
    ///
    /// # Errors
    ///
    /// - [`LinkError::CapabilityUnavailable`] without a wireless API (state unchanged)
    /// - [`LinkError::AlreadyConnected`] while a session is open (state unchanged)
    /// - [`LinkError::DiscoveryCancelled`] when the user dismisses the chooser (`Idle`)
    /// - [`LinkError::ConnectionFailed`] for other chooser failures (`Idle`)
    pub async fn discover(&mut self) -> Result<PeripheralInfo> {
        if !self.platform.is_available() {
            return Err(self.fail(LinkError::CapabilityUnavailable, None));
        }
        if let Some(session) = &self.session {
            let error = LinkError::already_connected(session.display_name());
            return Err(self.fail(error, None));
        }

        self.last_error = None;
        self.transition(LinkState::Discovering);

        let filter = self.config.discovery_filter();
        match self.platform.request_peripheral(&filter).await {
            Ok(peripheral) => {
                crate::info!(
                    "selected peripheral {} ({})",
                    peripheral.id,
                    peripheral.name.as_deref().unwrap_or("unnamed")
                );
                self.session = Some(SensorSession::new(peripheral.clone()));
                self.transition(LinkState::Connecting);
                Ok(peripheral)
            }
            Err(error) => Err(self.fail(LinkError::from_discovery(error), Some(LinkState::Idle))),
        }
    }

    /// Open the logical connection to `peripheral`.
    ///
    /// Valid after [`discover`](Self::discover) or, for a known peripheral, from
    /// `Idle`/`Disconnected`. On success the link is `Subscribing`.
    ///
    /// # Errors
    ///
    /// [`LinkError::ConnectionFailed`] returns the link to `Idle` and discards the
    /// session. [`LinkError::AlreadyConnected`] / [`LinkError::InvalidState`] leave
    /// everything untouched.
    pub async fn connect(&mut self, peripheral: PeripheralInfo) -> Result<()> {
        if let Some(session) = self.session.as_ref().filter(|s| s.is_connected()) {
            let error = LinkError::already_connected(session.display_name());
            return Err(self.fail(error, None));
        }
        if !matches!(
            self.state,
            LinkState::Connecting | LinkState::Idle | LinkState::Disconnected
        ) {
            return Err(self.fail(LinkError::invalid_state("connect", self.state), None));
        }

        let id = peripheral.id.clone();
        self.session = Some(SensorSession::new(peripheral));
        self.transition(LinkState::Connecting);

        let platform = Arc::clone(&self.platform);
        match bounded(self.config.operation_timeout(), platform.connect(&id)).await {
            Ok(()) => {
                if let Some(session) = self.session.as_mut() {
                    session.mark_connected();
                }
                crate::info!("connected to {id}");
                self.transition(LinkState::Subscribing);
                Ok(())
            }
            Err(attempt) => {
                if matches!(attempt, Attempt::TimedOut(_)) {
                    // The platform may still complete the connection later.
                    self.close_quietly(&id).await;
                }
                self.session = None;
                self.discard_pending();
                let error = LinkError::connection_failed(attempt.into_connect_failure());
                Err(self.fail(error, Some(LinkState::Idle)))
            }
        }
    }

    /// Resolve the service and both characteristics and enable notifications.
    ///
    /// # Errors
    ///
    /// [`LinkError::SubscriptionFailed`] moves the link to `Error` and leaves the
    /// connection open; call [`disconnect`](Self::disconnect) to close it.
    pub async fn subscribe(&mut self) -> Result<()> {
        if self.state != LinkState::Subscribing {
            return Err(self.fail(LinkError::invalid_state("subscribe", self.state), None));
        }
        let Some(id) = self.session.as_ref().map(|s| s.id().clone()) else {
            return Err(self.fail(LinkError::invalid_state("subscribe", self.state), None));
        };

        let platform = Arc::clone(&self.platform);
        match establish(platform.as_ref(), &self.config, &id).await {
            Ok(handles) => {
                if let Some(session) = self.session.as_mut() {
                    for (channel, handle) in handles {
                        session.attach(channel, handle);
                    }
                }
                crate::info!("streaming from {id}");
                self.transition(LinkState::Streaming);
                Ok(())
            }
            Err((handles, error)) => {
                if let Some(session) = self.session.as_mut() {
                    for (channel, handle) in handles {
                        session.attach(channel, handle);
                    }
                }
                Err(self.fail(error, Some(LinkState::Error)))
            }
        }
    }

    /// Discover, connect and subscribe in one go.
    ///
    /// # Errors
    ///
    /// The first failing step's error, with that step's state consequences.
    pub async fn connect_and_stream(&mut self) -> Result<PeripheralInfo> {
        let peripheral = self.discover().await?;
        self.connect(peripheral.clone()).await?;
        self.subscribe().await?;
        Ok(peripheral)
    }

    /// Read both characteristics once and merge them like notifications.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidState`] unless streaming, [`LinkError::ConnectionFailed`]
    /// when a read fails, or the decode error of a malformed payload.
    pub async fn read_current(&mut self) -> Result<Measurement> {
        let handles: Option<Handles> = self
            .session
            .as_ref()
            .filter(|_| self.state == LinkState::Streaming)
            .map(|session| {
                session
                    .characteristics()
                    .map(|(channel, handle)| (channel, handle.clone()))
                    .collect()
            });
        let Some(handles) = handles else {
            return Err(self.fail(LinkError::invalid_state("read", self.state), None));
        };

        let platform = Arc::clone(&self.platform);
        let mut merged = None;
        for (channel, handle) in handles {
            let raw = match platform.read_value(&handle).await {
                Ok(raw) => raw,
                Err(error) => return Err(self.fail(LinkError::connection_failed(error), None)),
            };
            merged = Some(self.apply_sample(channel, &raw)?);
        }

        merged.ok_or_else(|| LinkError::invalid_state("read", self.state))
    }

    /// Apply a temperature notification payload.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidState`] outside `Subscribing`/`Streaming`, or the decode
    /// error of a malformed payload. Neither changes any state.
    pub fn on_temperature_changed(&mut self, raw: &[u8]) -> Result<Measurement> {
        self.apply_sample(Channel::Temperature, raw)
    }

    /// Apply a vibration notification payload.
    ///
    /// # Errors
    ///
    /// Same as [`on_temperature_changed`](Self::on_temperature_changed).
    pub fn on_vibration_changed(&mut self, raw: &[u8]) -> Result<Measurement> {
        self.apply_sample(Channel::Vibration, raw)
    }

    /// The peripheral dropped the link.
    ///
    /// Clears the latest measurement and the session; the history is kept.
    pub fn on_peripheral_disconnected(&mut self) {
        if self.session.is_none() && self.state.is_at_rest() {
            return;
        }

        if let Some(session) = &self.session {
            crate::info!("peripheral {} disconnected", session.id());
        }
        self.session = None;
        self.latest = None;
        self.discard_pending();
        self.transition(LinkState::Disconnected);
    }

    /// User-initiated disconnect.
    ///
    /// Disables notifications and closes the link when one is open, then behaves like
    /// [`on_peripheral_disconnected`](Self::on_peripheral_disconnected). Events still
    /// queued for the closed session are discarded. A no-op from
    /// `Idle` or `Disconnected`. Close failures are logged, never returned.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidState`] only while a discovery is in flight.
    pub async fn disconnect(&mut self) -> Result<()> {
        match self.state {
            LinkState::Idle | LinkState::Disconnected => return Ok(()),
            LinkState::Discovering => {
                let error = LinkError::invalid_state("disconnect", self.state);
                return Err(self.fail(error, None));
            }
            LinkState::Connecting
            | LinkState::Subscribing
            | LinkState::Streaming
            | LinkState::Error => {}
        }

        if let Some(session) = self.session.take() {
            if session.is_connected() {
                self.close(&session).await;
            }
            crate::info!("disconnected from {}", session.id());
        }
        self.latest = None;
        self.discard_pending();
        self.transition(LinkState::Disconnected);
        Ok(())
    }

    /// Wait for the next event concerning the current session and apply it.
    ///
    /// Irrelevant or malformed events are skipped. Returns `None` once the platform
    /// closes its event queue.
    pub async fn next_event(&mut self) -> Option<LinkEvent> {
        loop {
            let event = self.events.recv().await.ok()?;
            if let Some(applied) = self.handle_event(event) {
                return Some(applied);
            }
        }
    }

    /// Apply every event already queued without waiting. Returns how many applied.
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.handle_event(event).is_some() {
                applied += 1;
            }
        }
        applied
    }

    /// Pump events until the link drops, the platform queue closes, or `cancel`
    /// fires. Returns the number of samples applied.
    pub async fn run_until_disconnected(&mut self, cancel: &CancellationToken) -> usize {
        let mut samples = 0;
        while self.state.accepts_samples() {
            let next = self.next_event();
            futures::pin_mut!(next);
            match select(next, cancel.cancelled()).await {
                Either::Left((Some(LinkEvent::Disconnected) | None, _)) | Either::Right(_) => {
                    break
                }
                Either::Left((Some(_), _)) => samples += 1,
            }
        }
        samples
    }

    /// Classify and apply one platform event.
    ///
    /// Returns the applied event, or `None` when it was discarded.
    pub fn handle_event(&mut self, event: PlatformEvent) -> Option<LinkEvent> {
        let Some(current) = self.session.as_ref().map(|s| s.id().clone()) else {
            crate::debug!("discarding {event:?}: no session");
            return None;
        };
        let Some(event) = LinkEvent::classify(event, &current, &self.config) else {
            crate::debug!("discarding event not addressed to session {current}");
            return None;
        };

        match &event {
            LinkEvent::TemperatureSample(raw) | LinkEvent::VibrationSample(raw) => {
                let channel = event.channel()?;
                if let Err(error) = self.apply_sample(channel, raw) {
                    crate::warn!("dropping {channel} notification: {error}");
                    return None;
                }
            }
            LinkEvent::Disconnected => self.on_peripheral_disconnected(),
        }
        Some(event)
    }

    /// Drop everything queued for a session that no longer exists.
    fn discard_pending(&self) {
        let mut discarded = 0_usize;
        while self.events.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            crate::debug!("discarded {discarded} events left over from the closed session");
        }
    }

    fn apply_sample(&mut self, channel: Channel, raw: &[u8]) -> Result<Measurement> {
        if !self.state.accepts_samples() {
            return Err(LinkError::invalid_state(
                format!("apply {channel} sample"),
                self.state,
            ));
        }
        let value = decode_sample(raw)?;

        let merged = Measurement::merge(self.latest.as_ref(), channel, value, Utc::now());
        self.latest = Some(merged);
        self.history.push(merged);
        self.publish();
        Ok(merged)
    }

    async fn close(&self, session: &SensorSession) {
        for (channel, handle) in session.characteristics() {
            if let Err(error) = self.platform.stop_notifications(handle).await {
                crate::debug!("stopping {channel} notifications failed: {error}");
            }
        }
        self.close_quietly(session.id()).await;
    }

    async fn close_quietly(&self, id: &PeripheralId) {
        if let Err(error) = self.platform.disconnect(id).await {
            crate::warn!("closing link to {id} failed: {error}");
        }
    }

    fn transition(&mut self, next: LinkState) {
        if self.state != next {
            crate::info!("link state {} -> {}", self.state, next);
        }
        self.state = next;
        self.publish();
    }

    /// Record a failure for display, optionally move to `next`, and hand the error back.
    fn fail(&mut self, error: LinkError, next: Option<LinkState>) -> LinkError {
        if error.is_benign() {
            crate::info!("{error}");
        } else {
            crate::warn!("{error}");
        }
        self.last_error = Some(error.to_string());
        match next {
            Some(state) => self.transition(state),
            None => self.publish(),
        }
        error
    }

    fn publish(&self) {
        // Closed only on drop.
        let _ = self.snapshots.publish(self.snapshot());
    }
}

impl<P: WirelessPlatform> Drop for SensorLink<P> {
    fn drop(&mut self) {
        self.snapshots.close();
    }
}

type Handles = Vec<(Channel, CharacteristicHandle)>;

/// Resolve service and characteristics, then enable notifications on both.
///
/// On failure returns what was resolved so far alongside the error.
async fn establish<P: WirelessPlatform + ?Sized>(
    platform: &P,
    config: &LinkConfig,
    id: &PeripheralId,
) -> std::result::Result<Handles, (Handles, LinkError)> {
    let limit = config.operation_timeout();
    let failed = |handles: Handles, step: String, attempt: Attempt| {
        (handles, LinkError::subscription_failed(step, attempt.into_reason()))
    };

    let service = bounded(limit, platform.resolve_service(id, config.service))
        .await
        .map_err(|attempt| failed(Vec::new(), "resolving service".to_string(), attempt))?;

    let mut handles = Vec::with_capacity(Channel::ALL.len());
    for channel in Channel::ALL {
        let uuid = config.characteristic(channel);
        match bounded(limit, platform.resolve_characteristic(&service, uuid)).await {
            Ok(handle) => handles.push((channel, handle)),
            Err(attempt) => {
                return Err(failed(
                    handles,
                    format!("resolving {channel} characteristic"),
                    attempt,
                ))
            }
        }
    }

    let mut failure = None;
    for (channel, handle) in &handles {
        if let Err(attempt) = bounded(limit, platform.start_notifications(handle)).await {
            failure = Some((format!("enabling {channel} notifications"), attempt));
            break;
        }
    }

    match failure {
        Some((step, attempt)) => Err(failed(handles, step, attempt)),
        None => Ok(handles),
    }
}

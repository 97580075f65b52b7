// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A simulated VibeMon peripheral.
//!
//! Stands in for the radio when no sensor is at hand: the chooser always offers
//! one peripheral, and once notifications are enabled a background task publishes
//! random readings in the ranges a healthy machine produces.

use crate::config::SimulatorConfig;
use crate::task::BackgroundTask;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::time::interval;
use uuid::Uuid;
use vibemon_core::{encode_sample, CancellationToken, Channel, SERVICE_UUID};
use vibemon_error::PlatformError;
use vibemon_link::{
    CharacteristicHandle, DiscoveryFilter, PeripheralId, PeripheralInfo, PlatformEvent,
    ServiceHandle, WirelessPlatform,
};

/// Draw a reading for `channel` from the simulated sensor's range.
pub fn simulated_reading(rng: &mut impl Rng, channel: Channel) -> f32 {
    match channel {
        Channel::Temperature => rng.random_range(42.0..50.0),
        Channel::Vibration => rng.random_range(1.0..1.5),
    }
}

fn channel_of(characteristic: Uuid) -> Option<Channel> {
    Channel::ALL
        .into_iter()
        .find(|channel| channel.default_characteristic() == characteristic)
}

#[derive(Debug, Default)]
struct Radio {
    connected: bool,
    notifying: Vec<Channel>,
    temperature: Option<f32>,
    vibration: Option<f32>,
    sent: u64,
}

impl Radio {
    fn record(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::Temperature => self.temperature = Some(value),
            Channel::Vibration => self.vibration = Some(value),
        }
    }

    fn last(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Vibration => self.vibration,
        }
    }

    fn ensure_connected(&self) -> Result<(), PlatformError> {
        if self.connected {
            Ok(())
        } else {
            Err(PlatformError::failure("GATT server is disconnected"))
        }
    }
}

/// [`WirelessPlatform`] backed by a simulated sensor.
pub struct SimulatedPlatform {
    settings: SimulatorConfig,
    peripheral: PeripheralInfo,
    radio: Arc<Mutex<Radio>>,
    producer: Mutex<Option<BackgroundTask>>,
    events_tx: async_channel::Sender<PlatformEvent>,
    events_rx: async_channel::Receiver<PlatformEvent>,
}

impl SimulatedPlatform {
    #[must_use]
    pub fn new(settings: SimulatorConfig) -> Self {
        let (events_tx, events_rx) = async_channel::unbounded();
        let peripheral = PeripheralInfo::new("SIM:00:00:00:00:01", Some(&settings.name));
        Self {
            settings,
            peripheral,
            radio: Arc::new(Mutex::new(Radio::default())),
            producer: Mutex::new(None),
            events_tx,
            events_rx,
        }
    }

    /// The one peripheral the chooser offers.
    #[must_use]
    pub fn peripheral(&self) -> &PeripheralInfo {
        &self.peripheral
    }

    /// Notifications published since the last connect.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.radio.lock().sent
    }

    fn start_producer(&self) {
        let mut producer = self.producer.lock();
        if producer.is_some() {
            return;
        }

        let radio = Arc::clone(&self.radio);
        let tx = self.events_tx.clone();
        let period = self.settings.period();
        let drop_after = self.settings.drop_after;
        let peripheral = self.peripheral.id.clone();
        *producer = Some(BackgroundTask::spawn(move |cancel| {
            produce(radio, tx, period, drop_after, peripheral, cancel)
        }));
    }

    fn stop_producer(&self) {
        self.producer.lock().take();
    }
}

async fn produce(
    radio: Arc<Mutex<Radio>>,
    tx: async_channel::Sender<PlatformEvent>,
    period: Duration,
    drop_after: Option<u64>,
    peripheral: PeripheralId,
    cancel: CancellationToken,
) {
    let mut ticker = interval(period);
    // The first tick completes immediately; readings start one period in.
    ticker.tick().await;

    loop {
        select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let (events, dropped) = {
            let mut radio = radio.lock();
            if !radio.connected {
                break;
            }

            let mut rng = rand::rng();
            let mut events = Vec::with_capacity(radio.notifying.len());
            for channel in radio.notifying.clone() {
                let value = simulated_reading(&mut rng, channel);
                radio.record(channel, value);
                events.push(PlatformEvent::Notification {
                    peripheral: peripheral.clone(),
                    characteristic: channel.default_characteristic(),
                    payload: encode_sample(value).to_vec(),
                });
            }
            radio.sent += events.len() as u64;

            let dropped = drop_after.is_some_and(|limit| radio.sent >= limit);
            if dropped {
                radio.connected = false;
                radio.notifying.clear();
            }
            (events, dropped)
        };

        for event in events {
            if tx.send(event).await.is_err() {
                return;
            }
        }

        if dropped {
            tracing::info!("simulated peripheral {peripheral} dropped the link");
            let _ = tx.send(PlatformEvent::Disconnected { peripheral }).await;
            break;
        }
    }
}

impl Drop for SimulatedPlatform {
    fn drop(&mut self) {
        self.events_tx.close();
    }
}

#[async_trait]
impl WirelessPlatform for SimulatedPlatform {
    fn is_available(&self) -> bool {
        true
    }

    async fn request_peripheral(
        &self,
        filter: &DiscoveryFilter,
    ) -> Result<PeripheralInfo, PlatformError> {
        if filter.matches(self.peripheral.name.as_deref(), &[SERVICE_UUID]) {
            Ok(self.peripheral.clone())
        } else {
            Err(PlatformError::not_found("no matching peripheral in range"))
        }
    }

    async fn connect(&self, peripheral: &PeripheralId) -> Result<(), PlatformError> {
        if peripheral != &self.peripheral.id {
            return Err(PlatformError::not_found(peripheral.to_string()));
        }
        // A producer that ended on its own still occupies the slot.
        self.stop_producer();
        let mut radio = self.radio.lock();
        radio.connected = true;
        radio.sent = 0;
        Ok(())
    }

    async fn resolve_service(
        &self,
        peripheral: &PeripheralId,
        service: Uuid,
    ) -> Result<ServiceHandle, PlatformError> {
        self.radio.lock().ensure_connected()?;
        if service != SERVICE_UUID {
            return Err(PlatformError::not_found(format!("service {service}")));
        }
        Ok(ServiceHandle {
            peripheral: peripheral.clone(),
            uuid: service,
        })
    }

    async fn resolve_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Uuid,
    ) -> Result<CharacteristicHandle, PlatformError> {
        self.radio.lock().ensure_connected()?;
        channel_of(characteristic)
            .map(|_| CharacteristicHandle {
                peripheral: service.peripheral.clone(),
                service: service.uuid,
                uuid: characteristic,
            })
            .ok_or_else(|| PlatformError::not_found(format!("characteristic {characteristic}")))
    }

    async fn start_notifications(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<(), PlatformError> {
        let channel = channel_of(characteristic.uuid)
            .ok_or_else(|| PlatformError::failure("characteristic does not notify"))?;
        {
            let mut radio = self.radio.lock();
            radio.ensure_connected()?;
            if !radio.notifying.contains(&channel) {
                radio.notifying.push(channel);
            }
        }
        self.start_producer();
        Ok(())
    }

    async fn stop_notifications(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<(), PlatformError> {
        let mut radio = self.radio.lock();
        radio
            .notifying
            .retain(|channel| channel.default_characteristic() != characteristic.uuid);
        Ok(())
    }

    async fn read_value(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<Vec<u8>, PlatformError> {
        let channel = channel_of(characteristic.uuid)
            .ok_or_else(|| PlatformError::failure("characteristic is not readable"))?;
        let mut radio = self.radio.lock();
        radio.ensure_connected()?;
        let value = match radio.last(channel) {
            Some(value) => value,
            None => {
                let value = simulated_reading(&mut rand::rng(), channel);
                radio.record(channel, value);
                value
            }
        };
        Ok(encode_sample(value).to_vec())
    }

    async fn disconnect(&self, _peripheral: &PeripheralId) -> Result<(), PlatformError> {
        {
            let mut radio = self.radio.lock();
            radio.connected = false;
            radio.notifying.clear();
        }
        self.stop_producer();
        Ok(())
    }

    fn events(&self) -> async_channel::Receiver<PlatformEvent> {
        self.events_rx.clone()
    }
}

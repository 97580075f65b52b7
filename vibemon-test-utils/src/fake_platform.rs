// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A scripted [`WirelessPlatform`] for driving the link manager in tests.
//!
//! Failures are scripted up front with the consuming builder methods; samples and
//! link drops are pushed while the test runs. Every primitive call is recorded so
//! tests can assert on what the manager asked the platform to do.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;
use vibemon_core::{encode_sample, Channel, SERVICE_UUID};
use vibemon_error::PlatformError;
use vibemon_link::{
    CharacteristicHandle, DiscoveryFilter, PeripheralId, PeripheralInfo, PlatformEvent,
    ServiceHandle, WirelessPlatform,
};

use crate::fixtures::sensor_peripheral;

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RequestPeripheral,
    Connect(PeripheralId),
    ResolveService(Uuid),
    ResolveCharacteristic(Uuid),
    StartNotifications(Uuid),
    StopNotifications(Uuid),
    ReadValue(Uuid),
    Disconnect(PeripheralId),
}

#[derive(Debug)]
struct Script {
    available: bool,
    chooser: Result<PeripheralInfo, PlatformError>,
    chooser_delay: Option<Duration>,
    connect: Option<PlatformError>,
    connect_delay: Option<Duration>,
    service: Option<Uuid>,
    missing_characteristics: Vec<Uuid>,
    failing_notifications: Vec<Uuid>,
    read_values: HashMap<Uuid, Vec<u8>>,
    fail_reads: bool,
    fail_disconnect: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            available: true,
            chooser: Ok(sensor_peripheral()),
            chooser_delay: None,
            connect: None,
            connect_delay: None,
            service: Some(SERVICE_UUID),
            missing_characteristics: Vec::new(),
            failing_notifications: Vec::new(),
            read_values: HashMap::new(),
            fail_reads: false,
            fail_disconnect: false,
        }
    }
}

/// Scripted fake wireless platform.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vibemon_link::{LinkConfig, SensorLink};
/// use vibemon_test_utils::FakePlatform;
///
/// # #[tokio::main]
/// # async fn main() {
/// let platform = Arc::new(FakePlatform::new());
/// let mut link = SensorLink::new(Arc::clone(&platform), LinkConfig::default());
/// link.connect_and_stream().await.unwrap();
///
/// platform.push_temperature(42.5);
/// link.next_event().await;
/// assert_eq!(link.latest().and_then(|m| m.temperature), Some(42.5));
/// # }
/// ```
pub struct FakePlatform {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
    current: Mutex<Option<PeripheralId>>,
    events_tx: async_channel::Sender<PlatformEvent>,
    events_rx: async_channel::Receiver<PlatformEvent>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    /// A platform whose chooser selects [`sensor_peripheral`] and where every step
    /// succeeds.
    #[must_use]
    pub fn new() -> Self {
        let (events_tx, events_rx) = async_channel::unbounded();
        Self {
            script: Mutex::new(Script::default()),
            calls: Mutex::new(Vec::new()),
            current: Mutex::new(None),
            events_tx,
            events_rx,
        }
    }

    #[must_use]
    pub fn unavailable(self) -> Self {
        self.script.lock().available = false;
        self
    }

    #[must_use]
    pub fn selecting(self, peripheral: PeripheralInfo) -> Self {
        self.script.lock().chooser = Ok(peripheral);
        self
    }

    /// The user dismisses the chooser.
    #[must_use]
    pub fn cancelling_discovery(self) -> Self {
        self.failing_discovery(PlatformError::Cancelled)
    }

    #[must_use]
    pub fn failing_discovery(self, error: PlatformError) -> Self {
        self.script.lock().chooser = Err(error);
        self
    }

    /// The chooser stays open for `delay` before answering.
    #[must_use]
    pub fn delaying_discovery(self, delay: Duration) -> Self {
        self.script.lock().chooser_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn failing_connect(self, error: PlatformError) -> Self {
        self.script.lock().connect = Some(error);
        self
    }

    /// `connect` suspends for `delay` before succeeding.
    #[must_use]
    pub fn delaying_connect(self, delay: Duration) -> Self {
        self.script.lock().connect_delay = Some(delay);
        self
    }

    /// The peripheral exposes no matching primary service.
    #[must_use]
    pub fn without_service(self) -> Self {
        self.script.lock().service = None;
        self
    }

    #[must_use]
    pub fn without_characteristic(self, characteristic: Uuid) -> Self {
        self.script
            .lock()
            .missing_characteristics
            .push(characteristic);
        self
    }

    #[must_use]
    pub fn failing_notifications(self, characteristic: Uuid) -> Self {
        self.script.lock().failing_notifications.push(characteristic);
        self
    }

    #[must_use]
    pub fn failing_reads(self) -> Self {
        self.script.lock().fail_reads = true;
        self
    }

    #[must_use]
    pub fn failing_disconnect(self) -> Self {
        self.script.lock().fail_disconnect = true;
        self
    }

    /// Raw value returned by `read_value` for a characteristic.
    pub fn set_value(&self, characteristic: Uuid, payload: Vec<u8>) {
        self.script.lock().read_values.insert(characteristic, payload);
    }

    pub fn set_sample(&self, channel: Channel, value: f32) {
        self.set_value(
            channel.default_characteristic(),
            encode_sample(value).to_vec(),
        );
    }

    /// Notify a temperature sample from the connected peripheral.
    pub fn push_temperature(&self, celsius: f32) {
        self.push_sample(Channel::Temperature, celsius);
    }

    /// Notify a vibration sample from the connected peripheral.
    pub fn push_vibration(&self, g: f32) {
        self.push_sample(Channel::Vibration, g);
    }

    pub fn push_sample(&self, channel: Channel, value: f32) {
        self.push_raw(
            channel.default_characteristic(),
            encode_sample(value).to_vec(),
        );
    }

    /// Notify an arbitrary payload on `characteristic` from the connected peripheral.
    pub fn push_raw(&self, characteristic: Uuid, payload: Vec<u8>) {
        let peripheral = self.connected_or_default();
        self.push_from(peripheral, characteristic, payload);
    }

    /// Notify a payload as if it came from `peripheral`.
    pub fn push_from(&self, peripheral: PeripheralId, characteristic: Uuid, payload: Vec<u8>) {
        self.emit(PlatformEvent::Notification {
            peripheral,
            characteristic,
            payload,
        });
    }

    /// The peripheral drops the link.
    pub fn drop_link(&self) {
        let peripheral = self
            .current
            .lock()
            .take()
            .unwrap_or_else(|| sensor_peripheral().id);
        self.emit(PlatformEvent::Disconnected { peripheral });
    }

    /// Close the event queue, as a platform does when it shuts down.
    pub fn close_events(&self) {
        self.events_tx.close();
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Peripheral the fake believes is connected.
    #[must_use]
    pub fn connected(&self) -> Option<PeripheralId> {
        self.current.lock().clone()
    }

    fn connected_or_default(&self) -> PeripheralId {
        self.connected().unwrap_or_else(|| sensor_peripheral().id)
    }

    fn emit(&self, event: PlatformEvent) {
        // A closed queue means the test is shutting the platform down.
        let _ = self.events_tx.try_send(event);
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl WirelessPlatform for FakePlatform {
    fn is_available(&self) -> bool {
        self.script.lock().available
    }

    async fn request_peripheral(
        &self,
        filter: &DiscoveryFilter,
    ) -> Result<PeripheralInfo, PlatformError> {
        self.record(Call::RequestPeripheral);
        let (chooser, delay) = {
            let script = self.script.lock();
            (script.chooser.clone(), script.chooser_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let chosen = chooser?;
        let advertised = [SERVICE_UUID];
        if filter.matches(chosen.name.as_deref(), &advertised) {
            Ok(chosen)
        } else {
            Err(PlatformError::not_found("no matching peripheral in range"))
        }
    }

    async fn connect(&self, peripheral: &PeripheralId) -> Result<(), PlatformError> {
        self.record(Call::Connect(peripheral.clone()));
        let (failure, delay) = {
            let script = self.script.lock();
            (script.connect.clone(), script.connect_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = failure {
            return Err(error);
        }
        *self.current.lock() = Some(peripheral.clone());
        Ok(())
    }

    async fn resolve_service(
        &self,
        peripheral: &PeripheralId,
        service: Uuid,
    ) -> Result<ServiceHandle, PlatformError> {
        self.record(Call::ResolveService(service));
        match self.script.lock().service {
            Some(uuid) if uuid == service => Ok(ServiceHandle {
                peripheral: peripheral.clone(),
                uuid,
            }),
            _ => Err(PlatformError::not_found(format!("service {service}"))),
        }
    }

    async fn resolve_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Uuid,
    ) -> Result<CharacteristicHandle, PlatformError> {
        self.record(Call::ResolveCharacteristic(characteristic));
        if self
            .script
            .lock()
            .missing_characteristics
            .contains(&characteristic)
        {
            return Err(PlatformError::not_found(format!(
                "characteristic {characteristic}"
            )));
        }
        Ok(CharacteristicHandle {
            peripheral: service.peripheral.clone(),
            service: service.uuid,
            uuid: characteristic,
        })
    }

    async fn start_notifications(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<(), PlatformError> {
        self.record(Call::StartNotifications(characteristic.uuid));
        if self
            .script
            .lock()
            .failing_notifications
            .contains(&characteristic.uuid)
        {
            return Err(PlatformError::failure("GATT operation failed"));
        }
        Ok(())
    }

    async fn stop_notifications(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<(), PlatformError> {
        self.record(Call::StopNotifications(characteristic.uuid));
        Ok(())
    }

    async fn read_value(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<Vec<u8>, PlatformError> {
        self.record(Call::ReadValue(characteristic.uuid));
        let script = self.script.lock();
        if script.fail_reads {
            return Err(PlatformError::failure("GATT read failed"));
        }
        script
            .read_values
            .get(&characteristic.uuid)
            .cloned()
            .ok_or_else(|| PlatformError::failure("no value"))
    }

    async fn disconnect(&self, peripheral: &PeripheralId) -> Result<(), PlatformError> {
        self.record(Call::Disconnect(peripheral.clone()));
        if self.script.lock().fail_disconnect {
            return Err(PlatformError::failure("link already gone"));
        }
        self.current.lock().take();
        Ok(())
    }

    fn events(&self) -> async_channel::Receiver<PlatformEvent> {
        self.events_rx.clone()
    }
}

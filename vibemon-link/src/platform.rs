// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The wireless capability the link manager is driven against.
//!
//! Implementations wrap a real BLE stack, a browser's wireless API, a simulator, or
//! a scripted fake. The manager never touches the radio directly.

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;
use vibemon_error::PlatformError;

/// Platform-assigned identifier of a peripheral.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeripheralId(String);

impl PeripheralId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeripheralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the chooser returns for a selected peripheral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralInfo {
    pub id: PeripheralId,
    /// Advertised name; peripherals are not required to expose one.
    pub name: Option<String>,
}

impl PeripheralInfo {
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: PeripheralId::new(id),
            name: name.map(str::to_owned),
        }
    }
}

/// A resolved primary service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub peripheral: PeripheralId,
    pub uuid: Uuid,
}

/// A resolved characteristic of a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicHandle {
    pub peripheral: PeripheralId,
    pub service: Uuid,
    pub uuid: Uuid,
}

/// Chooser filters. A peripheral matches when its name starts with any prefix or
/// it advertises any of the services.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryFilter {
    pub name_prefixes: Vec<String>,
    pub services: Vec<Uuid>,
}

impl DiscoveryFilter {
    #[must_use]
    pub fn matches(&self, name: Option<&str>, advertised: &[Uuid]) -> bool {
        let by_name = name.is_some_and(|name| {
            self.name_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
        });
        by_name || advertised.iter().any(|uuid| self.services.contains(uuid))
    }
}

/// Asynchronous events pushed by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A characteristic the client subscribed to changed value.
    Notification {
        peripheral: PeripheralId,
        characteristic: Uuid,
        payload: Vec<u8>,
    },
    /// The link to a peripheral dropped (out of range, powered off, closed by peer).
    Disconnected { peripheral: PeripheralId },
}

/// Injected wireless capability.
///
/// Every operation may suspend; none may block. Notifications and disconnect
/// events are delivered on the queue returned by [`WirelessPlatform::events`] and
/// drained by the link manager on its own task.
#[async_trait]
pub trait WirelessPlatform: Send + Sync {
    /// Whether the wireless API exists in this environment.
    fn is_available(&self) -> bool;

    /// Present the device chooser and wait for the user's pick.
    async fn request_peripheral(
        &self,
        filter: &DiscoveryFilter,
    ) -> Result<PeripheralInfo, PlatformError>;

    /// Open a logical connection.
    async fn connect(&self, peripheral: &PeripheralId) -> Result<(), PlatformError>;

    async fn resolve_service(
        &self,
        peripheral: &PeripheralId,
        service: Uuid,
    ) -> Result<ServiceHandle, PlatformError>;

    async fn resolve_characteristic(
        &self,
        service: &ServiceHandle,
        characteristic: Uuid,
    ) -> Result<CharacteristicHandle, PlatformError>;

    async fn start_notifications(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<(), PlatformError>;

    async fn stop_notifications(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<(), PlatformError>;

    /// Read the characteristic's current raw payload.
    async fn read_value(
        &self,
        characteristic: &CharacteristicHandle,
    ) -> Result<Vec<u8>, PlatformError>;

    async fn disconnect(&self, peripheral: &PeripheralId) -> Result<(), PlatformError>;

    /// Queue of notifications and disconnect events.
    fn events(&self) -> async_channel::Receiver<PlatformEvent>;
}

//! Management channel abstraction
//!
//! The extension engine talks to the control plane only through
//! [`ManagementChannel`]. Every call is a blocking round trip; transport,
//! authentication and retries belong to the implementation.

use hsx_core::types::{
    DeploymentSlot, DeploymentSnapshot, DeploymentUpdate, ExtensionConfiguration, ExtensionRecord,
};
use hsx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Control plane operations needed by the extension engine
#[cfg_attr(test, mockall::automock)]
pub trait ManagementChannel {
    /// All extension records registered for a hosted service
    fn list_extension_records(&self, service: &str) -> Result<Vec<ExtensionRecord>>;

    /// Register a record. Fails with `DuplicateId` if the id is taken.
    fn add_extension_record(&self, service: &str, record: &ExtensionRecord) -> Result<()>;

    /// Remove a record. Fails with `NotFound` if it does not exist.
    fn delete_extension_record(&self, service: &str, id: &str) -> Result<()>;

    /// Current configuration of one deployment slot
    fn get_deployment(&self, service: &str, slot: DeploymentSlot) -> Result<DeploymentSnapshot>;

    /// Submit a "change deployment configuration" request
    fn update_deployment(
        &self,
        service: &str,
        slot: DeploymentSlot,
        update: &DeploymentUpdate,
    ) -> Result<()>;
}

/// Records and deployments of one hosted service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedServiceState {
    #[serde(default)]
    pub extensions: Vec<ExtensionRecord>,
    #[serde(default)]
    pub deployments: BTreeMap<DeploymentSlot, DeploymentSnapshot>,
}

/// Control plane state held by the in-process channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelState {
    #[serde(default)]
    pub services: BTreeMap<String, HostedServiceState>,
}

impl ChannelState {
    fn service(&self, service: &str) -> Result<&HostedServiceState> {
        self.services
            .get(service)
            .ok_or_else(|| Error::not_found("hosted service", service))
    }

    fn service_mut(&mut self, service: &str) -> Result<&mut HostedServiceState> {
        self.services
            .get_mut(service)
            .ok_or_else(|| Error::not_found("hosted service", service))
    }

    /// Create (or replace) a deployment with the given roles and no extensions.
    /// The hosted service is created on first use.
    pub fn create_deployment(&mut self, service: &str, slot: DeploymentSlot, roles: Vec<String>) {
        let snapshot = DeploymentSnapshot {
            slot,
            roles,
            ..Default::default()
        };
        self.services
            .entry(service.to_string())
            .or_default()
            .deployments
            .insert(slot, snapshot);
    }

    pub fn list_records(&self, service: &str) -> Result<Vec<ExtensionRecord>> {
        Ok(self.service(service)?.extensions.clone())
    }

    pub fn add_record(&mut self, service: &str, record: &ExtensionRecord) -> Result<()> {
        let state = self.service_mut(service)?;
        if state.extensions.iter().any(|r| r.id == record.id) {
            return Err(Error::duplicate_id(&record.id));
        }
        state.extensions.push(record.clone());
        Ok(())
    }

    pub fn delete_record(&mut self, service: &str, id: &str) -> Result<()> {
        let state = self.service_mut(service)?;
        let before = state.extensions.len();
        state.extensions.retain(|r| r.id != id);
        if state.extensions.len() == before {
            return Err(Error::not_found("extension", id));
        }
        Ok(())
    }

    pub fn deployment(&self, service: &str, slot: DeploymentSlot) -> Result<DeploymentSnapshot> {
        self.service(service)?
            .deployments
            .get(&slot)
            .cloned()
            .ok_or_else(|| Error::not_found("deployment", format!("{}/{}", service, slot)))
    }

    /// Apply an update. Every referenced extension id must be registered.
    pub fn apply_update(
        &mut self,
        service: &str,
        slot: DeploymentSlot,
        update: &DeploymentUpdate,
    ) -> Result<()> {
        let state = self.service_mut(service)?;
        check_references(&state.extensions, &update.extension_configuration)?;

        let deployment = state
            .deployments
            .get_mut(&slot)
            .ok_or_else(|| Error::not_found("deployment", format!("{}/{}", service, slot)))?;
        deployment.configuration = update.configuration.clone();
        deployment.extended_properties = update.extended_properties.clone();
        deployment.extension_configuration = update.extension_configuration.clone();
        Ok(())
    }
}

fn check_references(records: &[ExtensionRecord], config: &ExtensionConfiguration) -> Result<()> {
    let referenced = config
        .all_roles
        .iter()
        .chain(config.named_roles.iter().flat_map(|r| r.extensions.iter()));
    for reference in referenced {
        if !records.iter().any(|r| r.id == reference.id) {
            return Err(Error::not_found("extension", &reference.id));
        }
    }
    Ok(())
}

/// Process-local management channel.
///
/// Used by tests and for dry runs; state is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    state: Mutex<ChannelState>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ChannelState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Builder-style deployment seeding
    pub fn with_deployment(self, service: &str, slot: DeploymentSlot, roles: &[&str]) -> Self {
        self.create_deployment(service, slot, roles.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn create_deployment(&self, service: &str, slot: DeploymentSlot, roles: Vec<String>) {
        self.with_state(|state| state.create_deployment(service, slot, roles));
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ChannelState {
        self.with_state(|state| state.clone())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ChannelState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl ManagementChannel for InMemoryChannel {
    fn list_extension_records(&self, service: &str) -> Result<Vec<ExtensionRecord>> {
        self.with_state(|state| state.list_records(service))
    }

    fn add_extension_record(&self, service: &str, record: &ExtensionRecord) -> Result<()> {
        self.with_state(|state| state.add_record(service, record))
    }

    fn delete_extension_record(&self, service: &str, id: &str) -> Result<()> {
        self.with_state(|state| state.delete_record(service, id))
    }

    fn get_deployment(&self, service: &str, slot: DeploymentSlot) -> Result<DeploymentSnapshot> {
        self.with_state(|state| state.deployment(service, slot))
    }

    fn update_deployment(
        &self,
        service: &str,
        slot: DeploymentSlot,
        update: &DeploymentUpdate,
    ) -> Result<()> {
        self.with_state(|state| state.apply_update(service, slot, update))
    }
}

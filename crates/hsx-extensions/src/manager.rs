//! Deployment-level extension management
//!
//! Reads a deployment snapshot, runs the installer against its extension
//! configuration, and submits the result as a new deployment update. The
//! snapshot is never modified; each update is built from scratch.
//!
//! There is no optimistic concurrency check between reading the snapshot
//! and submitting the update. Concurrent callers against the same
//! deployment must be serialized by the caller.

use crate::allocator::ExtensionIdAllocator;
use crate::builder::ExtensionConfigurationBuilder;
use crate::channel::ManagementChannel;
use crate::installer::{
    ExtensionInstaller, InstallRequest, RoleSelector, UninstallOutcome, UninstallRequest,
};
use crate::store::ExtensionStore;
use hsx_core::types::{
    DeploymentSlot, DeploymentSnapshot, DeploymentUpdate, ExtensionConfiguration, ExtensionKind,
    ExtensionRoleScope,
};
use hsx_core::{Error, ExtensionSettings, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// An active extension as seen from one scope of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionContext {
    pub scope: ExtensionRoleScope,
    pub id: String,
    pub kind: ExtensionKind,
    pub public_configuration: String,
    pub thumbprint: Option<String>,
    pub thumbprint_algorithm: Option<String>,
}

pub struct ExtensionManager<'a, C: ManagementChannel + ?Sized> {
    channel: &'a C,
    settings: ExtensionSettings,
}

impl<'a, C: ManagementChannel + ?Sized> ExtensionManager<'a, C> {
    pub fn new(channel: &'a C, settings: ExtensionSettings) -> Self {
        Self { channel, settings }
    }

    fn installer(&self, service: &str, slot: DeploymentSlot) -> Result<ExtensionInstaller<'a, C>> {
        let allocator = ExtensionIdAllocator::from_settings(&self.settings)?;
        Ok(ExtensionInstaller::new(self.channel, service, slot, allocator))
    }

    /// Fetch the deployment and check that every named role exists in it
    fn snapshot(
        &self,
        service: &str,
        slot: DeploymentSlot,
        selector: &RoleSelector,
    ) -> Result<DeploymentSnapshot> {
        let snapshot = self.channel.get_deployment(service, slot)?;
        for role in &selector.roles {
            if !snapshot.has_role(role) {
                return Err(Error::not_found("role", role.as_str()));
            }
        }
        Ok(snapshot)
    }

    /// Install an extension and apply the new configuration to the deployment
    pub fn enable(
        &self,
        service: &str,
        slot: DeploymentSlot,
        request: &InstallRequest,
    ) -> Result<ExtensionConfiguration> {
        let snapshot = self.snapshot(service, slot, &request.selector)?;
        let configuration = self
            .installer(service, slot)?
            .install(&snapshot.extension_configuration, request)?;

        let update = DeploymentUpdate::from_snapshot(&snapshot, configuration.clone());
        self.channel.update_deployment(service, slot, &update)?;
        info!("Enabled {} on {} ({})", request.kind, service, slot);
        Ok(configuration)
    }

    /// Remove an extension kind and apply the new configuration.
    ///
    /// The deployment is left untouched when nothing matched.
    pub fn disable(
        &self,
        service: &str,
        slot: DeploymentSlot,
        request: &UninstallRequest,
    ) -> Result<UninstallOutcome> {
        let snapshot = self.snapshot(service, slot, &request.selector)?;
        let outcome = self
            .installer(service, slot)?
            .uninstall(&snapshot.extension_configuration, request)?;

        if outcome.is_noop() {
            warn!(
                "No {} extension found on {} ({}), nothing to remove",
                request.kind, service, slot
            );
            return Ok(outcome);
        }

        let update = DeploymentUpdate::from_snapshot(&snapshot, outcome.configuration.clone());
        self.channel.update_deployment(service, slot, &update)?;
        info!("Disabled {} on {} ({})", request.kind, service, slot);
        Ok(outcome)
    }

    /// Active extensions of `kind`, one entry per scope and id
    pub fn describe(
        &self,
        service: &str,
        slot: DeploymentSlot,
        kind: &ExtensionKind,
    ) -> Result<Vec<ExtensionContext>> {
        let snapshot = self.channel.get_deployment(service, slot)?;
        let builder = ExtensionConfigurationBuilder::from_configuration(
            &snapshot.extension_configuration,
        );
        let store = ExtensionStore::new(self.channel, service);
        let records: HashMap<_, _> = store
            .list()?
            .into_iter()
            .filter(|r| r.is_kind(kind))
            .map(|r| (r.id.clone(), r))
            .collect();

        let mut contexts = Vec::new();
        for scope in builder.scopes() {
            for id in builder.scope_ids(&scope) {
                if let Some(record) = records.get(id) {
                    contexts.push(ExtensionContext {
                        scope: scope.clone(),
                        id: record.id.clone(),
                        kind: record.kind.clone(),
                        public_configuration: record.public_configuration.clone(),
                        thumbprint: record.thumbprint.clone(),
                        thumbprint_algorithm: record.thumbprint_algorithm.clone(),
                    });
                }
            }
        }
        Ok(contexts)
    }
}

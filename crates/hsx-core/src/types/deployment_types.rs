//! Deployment snapshot and update types exchanged with a management channel

use super::{DeploymentSlot, ExtensionConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only view of a deployment's current configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    pub slot: DeploymentSlot,

    /// Role names defined by the deployment's package
    pub roles: Vec<String>,

    /// Raw service configuration blob, passed back untouched on update
    #[serde(default)]
    pub configuration: String,

    #[serde(default)]
    pub extended_properties: BTreeMap<String, String>,

    #[serde(default)]
    pub extension_configuration: ExtensionConfiguration,
}

impl DeploymentSnapshot {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// How the control plane rolls a configuration change across upgrade domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Auto,
    Manual,
}

/// A complete "change deployment configuration" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentUpdate {
    pub configuration: String,
    pub extended_properties: BTreeMap<String, String>,
    pub extension_configuration: ExtensionConfiguration,
    pub mode: UpdateMode,
    pub treat_warnings_as_error: bool,
}

impl DeploymentUpdate {
    /// Carry the snapshot's blob and properties forward with a new extension configuration
    pub fn from_snapshot(
        snapshot: &DeploymentSnapshot,
        extension_configuration: ExtensionConfiguration,
    ) -> Self {
        Self {
            configuration: snapshot.configuration.clone(),
            extended_properties: snapshot.extended_properties.clone(),
            extension_configuration,
            mode: UpdateMode::Auto,
            treat_warnings_as_error: false,
        }
    }
}

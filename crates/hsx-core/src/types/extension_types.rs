//! Extension record, kind, and role scope types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider namespace shared by the platform's built-in extensions
pub const BUILTIN_PROVIDER_NAMESPACE: &str = "Microsoft.Windows.Azure.Extensions";

/// Label used for the default (all roles) scope in generated ids
pub const DEFAULT_SCOPE_LABEL: &str = "Default";

/// The kind of an extension: provider namespace plus type.
///
/// Two records are the same kind when both parts match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionKind {
    pub provider_namespace: String,
    #[serde(rename = "Type")]
    pub r#type: String,
}

impl ExtensionKind {
    pub fn new(provider_namespace: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            provider_namespace: provider_namespace.into(),
            r#type: r#type.into(),
        }
    }

    /// Remote Desktop enablement agent
    pub fn remote_desktop() -> Self {
        Self::new(BUILTIN_PROVIDER_NAMESPACE, "RDP")
    }

    /// Diagnostics agent
    pub fn diagnostics() -> Self {
        Self::new(BUILTIN_PROVIDER_NAMESPACE, "Diagnostics")
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.provider_namespace, self.r#type)
    }
}

/// A hosted service extension record as registered with the control plane.
///
/// Records are immutable once added. Changing one means deleting it and
/// adding a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionRecord {
    pub id: String,

    #[serde(flatten)]
    pub kind: ExtensionKind,

    /// Certificate used to decrypt the private configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbprint_algorithm: Option<String>,

    #[serde(default)]
    pub public_configuration: String,

    #[serde(default)]
    pub private_configuration: String,
}

impl ExtensionRecord {
    /// Create a record with no certificate reference
    pub fn new(
        id: impl Into<String>,
        kind: ExtensionKind,
        public_configuration: impl Into<String>,
        private_configuration: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            thumbprint: None,
            thumbprint_algorithm: None,
            public_configuration: public_configuration.into(),
            private_configuration: private_configuration.into(),
        }
    }

    /// Attach a certificate reference
    pub fn with_thumbprint(
        mut self,
        thumbprint: impl Into<String>,
        algorithm: impl Into<String>,
    ) -> Self {
        self.thumbprint = Some(thumbprint.into());
        self.thumbprint_algorithm = Some(algorithm.into());
        self
    }

    pub fn is_kind(&self, kind: &ExtensionKind) -> bool {
        &self.kind == kind
    }
}

/// Where an extension applies within a deployment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "scope", content = "role", rename_all = "snake_case")]
pub enum ExtensionRoleScope {
    /// Every role without a role-specific override
    Default,
    /// One named role
    Named(String),
}

impl ExtensionRoleScope {
    pub fn named(role: impl Into<String>) -> Self {
        Self::Named(role.into())
    }

    /// Label used when generating extension ids
    pub fn label(&self) -> &str {
        match self {
            Self::Default => DEFAULT_SCOPE_LABEL,
            Self::Named(role) => role,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for ExtensionRoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "all roles"),
            Self::Named(role) => write!(f, "role {}", role),
        }
    }
}

/// Deployment slot of a hosted service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DeploymentSlot {
    #[default]
    Production,
    Staging,
}

impl DeploymentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Staging => "Staging",
        }
    }
}

impl fmt::Display for DeploymentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentSlot {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            other => Err(format!(
                "Unknown deployment slot: {}. Valid slots: production, staging",
                other
            )),
        }
    }
}

//! Extension id template rendering
//!
//! Placeholders: `{scope}` (role name or `Default`), `{type}` (extension
//! type), `{slot}` (deployment slot), `{index}` (rotation index).

use crate::error::{Error, Result};
use crate::types::{DeploymentSlot, ExtensionKind, ExtensionRoleScope};
use serde::{Deserialize, Serialize};

/// Template used when no other template is configured
pub const DEFAULT_ID_TEMPLATE: &str = "{scope}-{type}-{slot}-Ext-{index}";

const INDEX_PLACEHOLDER: &str = "{index}";

/// Every rendered id must be unique per scope, type, slot and rotation index
const REQUIRED_PLACEHOLDERS: &[&str] = &["{scope}", "{type}", "{slot}", INDEX_PLACEHOLDER];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdTemplate(String);

impl IdTemplate {
    /// Parse a template. It must contain every placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let missing: Vec<&str> = REQUIRED_PLACEHOLDERS
            .iter()
            .copied()
            .filter(|placeholder| !template.contains(placeholder))
            .collect();
        if !missing.is_empty() {
            return Err(Error::invalid_config(format!(
                "extension id template '{}' must contain {}",
                template,
                missing.join(", ")
            )));
        }
        Ok(Self(template))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(
        &self,
        scope: &ExtensionRoleScope,
        kind: &ExtensionKind,
        slot: DeploymentSlot,
        index: usize,
    ) -> String {
        self.0
            .replace("{scope}", scope.label())
            .replace("{type}", &kind.r#type)
            .replace("{slot}", slot.as_str())
            .replace(INDEX_PLACEHOLDER, &index.to_string())
    }

    /// All ids in the rotation pool, in index order
    pub fn candidates(
        &self,
        scope: &ExtensionRoleScope,
        kind: &ExtensionKind,
        slot: DeploymentSlot,
        pool_size: usize,
    ) -> Vec<String> {
        (0..pool_size)
            .map(|index| self.render(scope, kind, slot, index))
            .collect()
    }
}

impl Default for IdTemplate {
    fn default() -> Self {
        Self(DEFAULT_ID_TEMPLATE.to_string())
    }
}

impl TryFrom<String> for IdTemplate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<IdTemplate> for String {
    fn from(template: IdTemplate) -> Self {
        template.0
    }
}

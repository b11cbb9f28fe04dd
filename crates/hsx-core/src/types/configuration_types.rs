//! Extension configuration wire shape
//!
//! ```json
//! {
//!   "AllRoles": [ { "Id": "Default-Diagnostics-Production-Ext-0" } ],
//!   "NamedRoles": [
//!     { "RoleName": "WebRole1", "Extensions": [ { "Id": "WebRole1-RDP-Production-Ext-1" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reference to an extension record by id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtensionReference {
    #[serde(rename = "Id")]
    pub id: String,
}

impl ExtensionReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Extensions applied to one named role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleExtensions {
    pub role_name: String,
    #[serde(default)]
    pub extensions: Vec<ExtensionReference>,
}

/// Which extension records are active for a deployment, by role scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionConfiguration {
    #[serde(default)]
    pub all_roles: Vec<ExtensionReference>,
    #[serde(default)]
    pub named_roles: Vec<RoleExtensions>,
}

/// Order-insensitive view of a configuration
pub type ConfigurationMembership = (BTreeSet<String>, BTreeMap<String, BTreeSet<String>>);

impl ExtensionConfiguration {
    pub fn is_empty(&self) -> bool {
        self.all_roles.is_empty() && self.named_roles.iter().all(|r| r.extensions.is_empty())
    }

    /// Ids applied to all roles
    pub fn default_ids(&self) -> impl Iterator<Item = &str> {
        self.all_roles.iter().map(|r| r.id.as_str())
    }

    /// Ids applied to one named role
    pub fn role_ids<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a str> {
        self.named_roles
            .iter()
            .filter(move |r| r.role_name == role)
            .flat_map(|r| r.extensions.iter().map(|e| e.id.as_str()))
    }

    /// Membership as sets, ignoring order and duplicate entries.
    ///
    /// Named roles with no extensions are left out.
    pub fn membership(&self) -> ConfigurationMembership {
        let defaults = self.all_roles.iter().map(|r| r.id.clone()).collect();
        let mut named: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for role in &self.named_roles {
            if role.extensions.is_empty() {
                continue;
            }
            named
                .entry(role.role_name.clone())
                .or_default()
                .extend(role.extensions.iter().map(|e| e.id.clone()));
        }
        (defaults, named)
    }

    /// True when both configurations activate the same ids for the same scopes
    pub fn same_membership(&self, other: &ExtensionConfiguration) -> bool {
        self.membership() == other.membership()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = r#"{
            "AllRoles": [ { "Id": "Default-Diagnostics-Production-Ext-0" } ],
            "NamedRoles": [
                { "RoleName": "WebRole1", "Extensions": [ { "Id": "WebRole1-RDP-Production-Ext-1" } ] }
            ]
        }"#;

        let config: ExtensionConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.default_ids().collect::<Vec<_>>(),
            vec!["Default-Diagnostics-Production-Ext-0"]
        );
        assert_eq!(
            config.role_ids("WebRole1").collect::<Vec<_>>(),
            vec!["WebRole1-RDP-Production-Ext-1"]
        );
        assert_eq!(config.role_ids("WebRole2").count(), 0);

        let out = serde_json::to_value(&config).unwrap();
        assert_eq!(out["NamedRoles"][0]["RoleName"], "WebRole1");
        assert_eq!(out["NamedRoles"][0]["Extensions"][0]["Id"], "WebRole1-RDP-Production-Ext-1");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let config: ExtensionConfiguration = serde_json::from_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_same_membership_ignores_order() {
        let a = ExtensionConfiguration {
            all_roles: vec![ExtensionReference::new("a"), ExtensionReference::new("b")],
            named_roles: vec![RoleExtensions {
                role_name: "WebRole1".to_string(),
                extensions: vec![ExtensionReference::new("c")],
            }],
        };
        let b = ExtensionConfiguration {
            all_roles: vec![ExtensionReference::new("b"), ExtensionReference::new("a")],
            named_roles: vec![
                RoleExtensions {
                    role_name: "WebRole2".to_string(),
                    extensions: vec![],
                },
                RoleExtensions {
                    role_name: "WebRole1".to_string(),
                    extensions: vec![ExtensionReference::new("c")],
                },
            ],
        };
        assert!(a.same_membership(&b));

        let c = ExtensionConfiguration {
            all_roles: vec![ExtensionReference::new("a")],
            ..b.clone()
        };
        assert!(!a.same_membership(&c));
    }
}

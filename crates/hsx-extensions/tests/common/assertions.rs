//! Assertion helpers for extension configurations

#![allow(dead_code)]

use hsx_core::types::{ExtensionConfiguration, ExtensionKind, ExtensionRoleScope};
use hsx_extensions::{ExtensionConfigurationBuilder, ExtensionStore, InMemoryChannel};

/// Ids of `kind` active in `scope`
pub fn ids_of_kind(
    channel: &InMemoryChannel,
    service: &str,
    config: &ExtensionConfiguration,
    scope: &ExtensionRoleScope,
    kind: &ExtensionKind,
) -> Vec<String> {
    let store = ExtensionStore::new(channel, service);
    ExtensionConfigurationBuilder::from_configuration(config)
        .ids_of_kind(&store, scope, kind)
        .unwrap()
}

/// Assert exactly one extension of `kind` is active in `scope` and return its id
pub fn assert_single_active(
    channel: &InMemoryChannel,
    service: &str,
    config: &ExtensionConfiguration,
    scope: &ExtensionRoleScope,
    kind: &ExtensionKind,
) -> String {
    let ids = ids_of_kind(channel, service, config, scope, kind);
    assert_eq!(
        ids.len(),
        1,
        "expected exactly one {} in {}, found {:?}",
        kind,
        scope,
        ids
    );
    ids.into_iter().next().unwrap()
}

/// Assert no named role in the configuration has an empty extension list
pub fn assert_no_empty_named_roles(config: &ExtensionConfiguration) {
    for role in &config.named_roles {
        assert!(
            !role.extensions.is_empty(),
            "named role {} has an empty extension list",
            role.role_name
        );
    }
}

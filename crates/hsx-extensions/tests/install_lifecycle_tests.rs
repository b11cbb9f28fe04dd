//! Install/uninstall lifecycle integration tests
//!
//! Covers:
//! - Enabling and disabling an extension for all roles
//! - Per-role installs alongside other roles
//! - Replacing an extension of the same kind
//! - Existence checks by scope and kind

mod common;

use common::*;
use hsx_core::types::{ExtensionConfiguration, ExtensionKind, ExtensionRoleScope};
use hsx_extensions::{ExtensionConfigurationBuilder, ExtensionStore, RoleSelector};

#[test]
fn test_enable_then_disable_rdp_for_all_roles() {
    let channel = seeded_channel();
    let installer = installer(&channel);

    let config = installer
        .install(
            &ExtensionConfiguration::default(),
            &rdp_install(RoleSelector::all(), "alice"),
        )
        .unwrap();
    assert_eq!(
        config.default_ids().collect::<Vec<_>>(),
        vec!["Default-RDP-Production-Ext-0"]
    );
    assert!(config.named_roles.is_empty());

    let outcome = installer
        .uninstall(&config, &rdp_uninstall(RoleSelector::all()))
        .unwrap();
    assert_eq!(outcome.removed, vec!["Default-RDP-Production-Ext-0".to_string()]);
    assert_eq!(outcome.configuration.all_roles.len(), 0);
    assert!(installer
        .store()
        .get("Default-RDP-Production-Ext-0")
        .unwrap()
        .is_none());
}

#[test]
fn test_diagnostics_on_one_of_two_roles() {
    let channel = seeded_channel();
    let installer = installer(&channel);

    let config = installer
        .install(
            &ExtensionConfiguration::default(),
            &diagnostics_install(RoleSelector::roles(["WebRole1"])),
        )
        .unwrap();

    assert!(config.all_roles.is_empty());
    assert_eq!(config.named_roles.len(), 1);
    assert_eq!(config.named_roles[0].role_name, "WebRole1");
    assert_eq!(config.named_roles[0].extensions.len(), 1);

    let store = ExtensionStore::new(&channel, SERVICE);
    let builder = ExtensionConfigurationBuilder::from_configuration(&config);
    let diagnostics = ExtensionKind::diagnostics();
    assert!(builder.exist_any_kind(&store, &diagnostics).unwrap());
    assert!(builder.exist_kind(&store, &["WebRole1"], &diagnostics).unwrap());
    assert!(!builder.exist_kind(&store, &["WebRole2"], &diagnostics).unwrap());
    assert!(!builder.exist_default_kind(&store, &diagnostics).unwrap());
}

#[test]
fn test_second_install_replaces_first() {
    let channel = seeded_channel();
    let installer = installer(&channel);
    let rdp = ExtensionKind::remote_desktop();

    let first = installer
        .install(
            &ExtensionConfiguration::default(),
            &rdp_install(RoleSelector::all(), "alice"),
        )
        .unwrap();
    let second = installer
        .install(&first, &rdp_install(RoleSelector::all(), "bob"))
        .unwrap();

    let active = assert_single_active(
        &channel,
        SERVICE,
        &second,
        &ExtensionRoleScope::Default,
        &rdp,
    );
    assert_eq!(active, "Default-RDP-Production-Ext-1");

    let record = installer.store().require(&active).unwrap();
    assert_eq!(record.public_configuration, "<User>bob</User>");

    // The replaced record stays registered until its slot is reused
    assert!(installer
        .store()
        .get("Default-RDP-Production-Ext-0")
        .unwrap()
        .is_some());
}

#[test]
fn test_repeated_installs_keep_one_active_per_scope() {
    let channel = seeded_channel();
    let installer = installer(&channel);
    let rdp = ExtensionKind::remote_desktop();
    let selector = RoleSelector {
        all_roles: true,
        roles: vec!["WebRole2".to_string()],
    };

    let mut config = ExtensionConfiguration::default();
    for user in ["alice", "bob", "carol", "dave"] {
        config = installer
            .install(&config, &rdp_install(selector.clone(), user))
            .unwrap();

        for scope in [
            ExtensionRoleScope::Default,
            ExtensionRoleScope::named("WebRole2"),
        ] {
            assert_single_active(&channel, SERVICE, &config, &scope, &rdp);
        }
        assert_no_empty_named_roles(&config);
    }

    // Pool of two: at most two records per scope remain registered
    let records = installer.store().list().unwrap();
    assert_eq!(records.len(), 4);
}

#[test]
fn test_install_keeps_other_kinds() {
    let channel = seeded_channel();
    let installer = installer(&channel);

    let config = installer
        .install(
            &ExtensionConfiguration::default(),
            &diagnostics_install(RoleSelector::all()),
        )
        .unwrap();
    let config = installer
        .install(&config, &rdp_install(RoleSelector::all(), "alice"))
        .unwrap();

    let mut ids: Vec<_> = config.default_ids().collect();
    ids.sort();
    assert_eq!(
        ids,
        vec![
            "Default-Diagnostics-Production-Ext-0",
            "Default-RDP-Production-Ext-0"
        ]
    );

    let outcome = installer
        .uninstall(&config, &rdp_uninstall(RoleSelector::all()))
        .unwrap();
    assert_eq!(
        outcome.configuration.default_ids().collect::<Vec<_>>(),
        vec!["Default-Diagnostics-Production-Ext-0"]
    );
}

#[test]
fn test_named_role_uninstall_leaves_default_scope() {
    let channel = seeded_channel();
    let installer = installer(&channel);
    let selector = RoleSelector {
        all_roles: true,
        roles: vec!["WebRole1".to_string()],
    };

    let config = installer
        .install(
            &ExtensionConfiguration::default(),
            &rdp_install(selector, "alice"),
        )
        .unwrap();
    let outcome = installer
        .uninstall(&config, &rdp_uninstall(RoleSelector::roles(["WebRole1"])))
        .unwrap();

    assert_eq!(outcome.removed, vec!["WebRole1-RDP-Production-Ext-0".to_string()]);
    assert!(outcome.configuration.named_roles.is_empty());
    assert_eq!(
        outcome.configuration.default_ids().collect::<Vec<_>>(),
        vec!["Default-RDP-Production-Ext-0"]
    );
}

#[test]
fn test_uninstall_without_matches_returns_unchanged_configuration() {
    let channel = seeded_channel();
    let installer = installer(&channel);
    let config = installer
        .install(
            &ExtensionConfiguration::default(),
            &diagnostics_install(RoleSelector::roles(["WebRole2"])),
        )
        .unwrap();

    let outcome = installer
        .uninstall(&config, &rdp_uninstall(RoleSelector::all()))
        .unwrap();
    assert!(outcome.is_noop());
    assert!(outcome.configuration.same_membership(&config));
}

#[test]
fn test_existence_follows_add_and_remove() {
    let mut builder = ExtensionConfigurationBuilder::new();
    let scopes = [
        ExtensionRoleScope::Default,
        ExtensionRoleScope::named("WebRole1"),
        ExtensionRoleScope::named("WebRole2"),
    ];
    let ids = ["Default-RDP-Production-Ext-0", "WebRole1-RDP-Production-Ext-1"];

    for scope in &scopes {
        for id in ids {
            builder.add(scope, id);
            assert!(builder.exist(scope, id));
            assert!(builder.exist_any(id));
            builder.remove(scope, id);
            assert!(!builder.exist(scope, id));
        }
    }
    assert!(builder.is_empty());
}

//! Deployment-level enable/disable/describe tests
//!
//! Runs the manager against the in-process channel and against the
//! file-backed channel in a temp directory.

mod common;

use camino::Utf8PathBuf;
use common::*;
use hsx_core::types::{ExtensionKind, ExtensionRoleScope};
use hsx_core::{Error, ExtensionSettings};
use hsx_extensions::{
    DiagnosticsSettings, ExtensionManager, InMemoryChannel, LocalChannel, ManagementChannel,
    RemoteDesktopSettings, RoleSelector,
};
use tempfile::TempDir;

fn create_test_channel() -> (TempDir, LocalChannel) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("state.json")).unwrap();
    let channel = LocalChannel::new(path);
    channel
        .create_deployment(SERVICE, SLOT, ROLES.iter().map(|r| r.to_string()).collect())
        .unwrap();
    (temp_dir, channel)
}

fn rdp() -> RemoteDesktopSettings {
    RemoteDesktopSettings::new("admin", "P@ssw0rd!")
}

#[test]
fn test_enable_updates_deployment() {
    let channel = seeded_channel();
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());

    let request = rdp().to_request(RoleSelector::all()).unwrap();
    let config = manager.enable(SERVICE, SLOT, &request).unwrap();

    let deployment = channel.get_deployment(SERVICE, SLOT).unwrap();
    assert_eq!(deployment.extension_configuration, config);
    assert_eq!(
        config.default_ids().collect::<Vec<_>>(),
        vec!["Default-RDP-Production-Ext-0"]
    );
}

#[test]
fn test_enable_carries_deployment_settings_forward() {
    let channel = seeded_channel();
    let mut state = channel.snapshot();
    let deployment = state
        .services
        .get_mut(SERVICE)
        .and_then(|s| s.deployments.get_mut(&SLOT))
        .unwrap();
    deployment.configuration = "<ServiceConfiguration/>".to_string();
    deployment
        .extended_properties
        .insert("Owner".to_string(), "ops".to_string());
    let channel = InMemoryChannel::from_state(state);
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());

    let request = DiagnosticsSettings::new("logs01", "a2V5")
        .to_request(RoleSelector::roles(["WebRole1"]))
        .unwrap();
    manager.enable(SERVICE, SLOT, &request).unwrap();

    let deployment = channel.get_deployment(SERVICE, SLOT).unwrap();
    assert_eq!(deployment.configuration, "<ServiceConfiguration/>");
    assert_eq!(deployment.extended_properties["Owner"], "ops");
    assert_eq!(
        deployment
            .extension_configuration
            .role_ids("WebRole1")
            .collect::<Vec<_>>(),
        vec!["WebRole1-Diagnostics-Production-Ext-0"]
    );
}

#[test]
fn test_unknown_role_is_rejected_before_any_change() {
    let channel = seeded_channel();
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());

    let request = rdp().to_request(RoleSelector::roles(["Missing"])).unwrap();
    let err = manager.enable(SERVICE, SLOT, &request).unwrap_err();

    assert!(matches!(err, Error::NotFound { what: "role", .. }));
    assert!(channel.list_extension_records(SERVICE).unwrap().is_empty());
}

#[test]
fn test_missing_deployment() {
    let channel = InMemoryChannel::new();
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());

    let request = rdp().to_request(RoleSelector::all()).unwrap();
    let err = manager.enable(SERVICE, SLOT, &request).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_disable_noop_leaves_deployment_untouched() {
    let channel = seeded_channel();
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());
    let before = channel.snapshot();

    let outcome = manager
        .disable(SERVICE, SLOT, &rdp_uninstall(RoleSelector::all()))
        .unwrap();

    assert!(outcome.is_noop());
    assert_eq!(channel.snapshot(), before);
}

#[test]
fn test_describe_lists_each_scope() {
    let channel = seeded_channel();
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());
    let selector = RoleSelector {
        all_roles: true,
        roles: vec!["WebRole2".to_string()],
    };
    manager
        .enable(SERVICE, SLOT, &rdp().to_request(selector).unwrap())
        .unwrap();

    let contexts = manager
        .describe(SERVICE, SLOT, &ExtensionKind::remote_desktop())
        .unwrap();

    let scopes: Vec<_> = contexts.iter().map(|c| c.scope.clone()).collect();
    assert_eq!(
        scopes,
        vec![
            ExtensionRoleScope::Default,
            ExtensionRoleScope::named("WebRole2")
        ]
    );
    assert!(contexts
        .iter()
        .all(|c| c.public_configuration.contains("<UserName>admin</UserName>")));
    assert!(manager
        .describe(SERVICE, SLOT, &ExtensionKind::diagnostics())
        .unwrap()
        .is_empty());
}

#[test]
fn test_local_channel_lifecycle() {
    let (_temp_dir, channel) = create_test_channel();
    let manager = ExtensionManager::new(&channel, ExtensionSettings::default());

    let request = rdp().to_request(RoleSelector::all()).unwrap();
    manager.enable(SERVICE, SLOT, &request).unwrap();
    manager.enable(SERVICE, SLOT, &request).unwrap();

    // A fresh handle on the same file sees the persisted state
    let reopened = LocalChannel::new(channel.path().to_path_buf());
    let deployment = reopened.get_deployment(SERVICE, SLOT).unwrap();
    assert_eq!(
        deployment.extension_configuration.default_ids().collect::<Vec<_>>(),
        vec!["Default-RDP-Production-Ext-1"]
    );
    assert_eq!(reopened.list_extension_records(SERVICE).unwrap().len(), 2);

    let outcome = ExtensionManager::new(&reopened, ExtensionSettings::default())
        .disable(SERVICE, SLOT, &rdp_uninstall(RoleSelector::all()))
        .unwrap();
    assert_eq!(outcome.removed, vec!["Default-RDP-Production-Ext-1"]);

    let deployment = channel.get_deployment(SERVICE, SLOT).unwrap();
    assert!(deployment.extension_configuration.is_empty());
    let ids: Vec<_> = channel
        .list_extension_records(SERVICE)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["Default-RDP-Production-Ext-0"]);
}

#[test]
fn test_settings_pool_size_applies() {
    let (_temp_dir, channel) = create_test_channel();
    let settings = ExtensionSettings::from_yaml("poolSize: 1\n").unwrap();
    let manager = ExtensionManager::new(&channel, settings);

    let request = rdp().to_request(RoleSelector::all()).unwrap();
    manager.enable(SERVICE, SLOT, &request).unwrap();
    let err = manager.enable(SERVICE, SLOT, &request).unwrap_err();

    assert!(matches!(err, Error::PoolExhausted { pool_size: 1, .. }));
}

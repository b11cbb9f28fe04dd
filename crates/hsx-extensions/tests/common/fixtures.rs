//! Seeded channels and requests

#![allow(dead_code)]

use hsx_core::types::{DeploymentSlot, ExtensionKind, ExtensionRecord};
use hsx_core::IdTemplate;
use hsx_extensions::{
    ExtensionIdAllocator, ExtensionInstaller, InMemoryChannel, InstallRequest, ManagementChannel,
    RoleSelector, UninstallRequest,
};

pub const SERVICE: &str = "contoso-web";
pub const SLOT: DeploymentSlot = DeploymentSlot::Production;
pub const ROLES: &[&str] = &["WebRole1", "WebRole2"];

/// Channel with one production deployment of WebRole1 and WebRole2
pub fn seeded_channel() -> InMemoryChannel {
    InMemoryChannel::new().with_deployment(SERVICE, SLOT, ROLES)
}

/// Register a record directly, bypassing the installer
pub fn register(channel: &InMemoryChannel, record: ExtensionRecord) {
    channel.add_extension_record(SERVICE, &record).unwrap();
}

pub fn allocator(pool_size: usize) -> ExtensionIdAllocator {
    ExtensionIdAllocator::new(IdTemplate::default(), pool_size, "sha1").unwrap()
}

pub fn installer(channel: &InMemoryChannel) -> ExtensionInstaller<'_, InMemoryChannel> {
    ExtensionInstaller::new(channel, SERVICE, SLOT, allocator(2))
}

pub fn rdp_install(selector: RoleSelector, user: &str) -> InstallRequest {
    InstallRequest::new(
        ExtensionKind::remote_desktop(),
        format!("<User>{}</User>", user),
        "<PrivateConfig><Password>secret</Password></PrivateConfig>",
        selector,
    )
}

pub fn diagnostics_install(selector: RoleSelector) -> InstallRequest {
    InstallRequest::new(
        ExtensionKind::diagnostics(),
        "<PublicConfig><StorageAccount>logs01</StorageAccount></PublicConfig>",
        "<PrivateConfig><StorageKey>a2V5</StorageKey></PrivateConfig>",
        selector,
    )
}

pub fn rdp_uninstall(selector: RoleSelector) -> UninstallRequest {
    UninstallRequest::new(ExtensionKind::remote_desktop(), selector)
}

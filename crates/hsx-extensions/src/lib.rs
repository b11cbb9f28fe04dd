//! Hosted service extension management for hsx
//!
//! This crate handles:
//! - Extension record access through a management channel
//! - Extension id allocation over a rotation pool
//! - Building extension configurations for default and named role scopes
//! - Installing and uninstalling extensions into a deployment
//! - Payloads for the Remote Desktop and Diagnostics extensions

pub mod allocator;
pub mod builder;
pub mod channel;
pub mod installer;
pub mod local;
pub mod manager;
pub mod payloads;
pub mod store;

pub use allocator::{Allocation, CertificateRef, ExtensionIdAllocator};
pub use builder::ExtensionConfigurationBuilder;
pub use channel::{ChannelState, InMemoryChannel, ManagementChannel};
pub use installer::{
    ExtensionInstaller, InstallRequest, RoleSelector, UninstallOutcome, UninstallRequest,
};
pub use local::LocalChannel;
pub use manager::{ExtensionContext, ExtensionManager};
pub use payloads::{DiagnosticsSettings, RemoteDesktopSettings};
pub use store::ExtensionStore;

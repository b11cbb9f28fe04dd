//! Install and uninstall extensions into a deployment's extension configuration
//!
//! For each targeted scope an install:
//! 1. allocates an id (see [`ExtensionIdAllocator`]),
//! 2. deletes the stale record holding that id, if any,
//! 3. adds the new record,
//! 4. drops ids of the same kind from the scope and adds the new id.
//!
//! The working configuration is only touched after the remote calls for a
//! scope succeed. Any failure aborts the whole call and no configuration is
//! returned.

use crate::allocator::{CertificateRef, ExtensionIdAllocator};
use crate::builder::ExtensionConfigurationBuilder;
use crate::channel::ManagementChannel;
use crate::store::ExtensionStore;
use hsx_core::types::{
    DeploymentSlot, ExtensionConfiguration, ExtensionKind, ExtensionRecord, ExtensionRoleScope,
};
use hsx_core::Result;
use tracing::{debug, info};

/// Which scopes an operation targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSelector {
    pub all_roles: bool,
    pub roles: Vec<String>,
}

impl RoleSelector {
    /// The default (all roles) scope
    pub fn all() -> Self {
        Self {
            all_roles: true,
            roles: Vec::new(),
        }
    }

    /// Specific named roles
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_roles: false,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Target scopes. Selecting nothing means the default scope.
    pub fn scopes(&self) -> Vec<ExtensionRoleScope> {
        let mut scopes = Vec::new();
        if self.all_roles || self.roles.is_empty() {
            scopes.push(ExtensionRoleScope::Default);
        }
        for role in &self.roles {
            let scope = ExtensionRoleScope::named(role.as_str());
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        scopes
    }
}

/// An extension to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub kind: ExtensionKind,
    pub public_configuration: String,
    pub private_configuration: String,
    /// Explicit certificate; wins over one recovered from the rotation pool
    pub certificate: Option<CertificateRef>,
    pub selector: RoleSelector,
}

impl InstallRequest {
    pub fn new(
        kind: ExtensionKind,
        public_configuration: impl Into<String>,
        private_configuration: impl Into<String>,
        selector: RoleSelector,
    ) -> Self {
        Self {
            kind,
            public_configuration: public_configuration.into(),
            private_configuration: private_configuration.into(),
            certificate: None,
            selector,
        }
    }

    pub fn with_certificate(
        mut self,
        thumbprint: impl Into<String>,
        algorithm: Option<String>,
    ) -> Self {
        self.certificate = Some(CertificateRef {
            thumbprint: thumbprint.into(),
            algorithm,
        });
        self
    }
}

/// An extension kind to remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallRequest {
    pub kind: ExtensionKind,
    pub selector: RoleSelector,
}

impl UninstallRequest {
    pub fn new(kind: ExtensionKind, selector: RoleSelector) -> Self {
        Self { kind, selector }
    }
}

/// Result of an uninstall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallOutcome {
    pub configuration: ExtensionConfiguration,
    /// Ids removed from the configuration
    pub removed: Vec<String>,
}

impl UninstallOutcome {
    /// Nothing of the requested kind was found
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty()
    }
}

pub struct ExtensionInstaller<'a, C: ManagementChannel + ?Sized> {
    store: ExtensionStore<'a, C>,
    allocator: ExtensionIdAllocator,
    slot: DeploymentSlot,
}

impl<'a, C: ManagementChannel + ?Sized> ExtensionInstaller<'a, C> {
    pub fn new(
        channel: &'a C,
        service: impl Into<String>,
        slot: DeploymentSlot,
        allocator: ExtensionIdAllocator,
    ) -> Self {
        Self {
            store: ExtensionStore::new(channel, service),
            allocator,
            slot,
        }
    }

    pub fn store(&self) -> &ExtensionStore<'a, C> {
        &self.store
    }

    /// Install the requested extension into every selected scope and return
    /// the resulting configuration
    pub fn install(
        &self,
        current: &ExtensionConfiguration,
        request: &InstallRequest,
    ) -> Result<ExtensionConfiguration> {
        let mut builder = ExtensionConfigurationBuilder::from_configuration(current);

        for scope in request.selector.scopes() {
            self.install_scope(&mut builder, &scope, request)?;
        }

        Ok(builder.to_configuration())
    }

    fn install_scope(
        &self,
        builder: &mut ExtensionConfigurationBuilder,
        scope: &ExtensionRoleScope,
        request: &InstallRequest,
    ) -> Result<()> {
        let allocation = self.allocator.allocate(
            &self.store,
            builder,
            scope,
            &request.kind,
            self.slot,
            request.certificate.as_ref(),
        )?;

        if let Some(stale) = &allocation.stale_record {
            debug!("Replacing stale extension record {}", stale.id);
            self.store.delete(&stale.id)?;
        }

        let record = ExtensionRecord {
            id: allocation.id.clone(),
            kind: request.kind.clone(),
            thumbprint: allocation.thumbprint,
            thumbprint_algorithm: allocation.thumbprint_algorithm,
            public_configuration: request.public_configuration.clone(),
            private_configuration: request.private_configuration.clone(),
        };
        self.store.add(&record)?;

        let replaced = builder.remove_scope_kind(&self.store, scope, &request.kind)?;
        builder.add(scope, &allocation.id);

        info!(
            "Installed {} as {} for {}{}",
            request.kind,
            allocation.id,
            scope,
            if replaced.is_empty() {
                String::new()
            } else {
                format!(" (replacing {})", replaced.join(", "))
            }
        );
        Ok(())
    }

    /// Remove every extension of the requested kind from the selected scopes.
    ///
    /// Records no longer referenced by any scope are deleted from the store.
    /// Finding nothing is not an error; check [`UninstallOutcome::is_noop`].
    pub fn uninstall(
        &self,
        current: &ExtensionConfiguration,
        request: &UninstallRequest,
    ) -> Result<UninstallOutcome> {
        let mut builder = ExtensionConfigurationBuilder::from_configuration(current);
        let mut removed = Vec::new();

        for scope in request.selector.scopes() {
            for id in builder.ids_of_kind(&self.store, &scope, &request.kind)? {
                if !builder.exist_outside(&scope, &id) {
                    self.store.delete(&id)?;
                }
                builder.remove(&scope, &id);
                info!("Removed {} ({}) from {}", id, request.kind, scope);
                if !removed.contains(&id) {
                    removed.push(id);
                }
            }
        }

        Ok(UninstallOutcome {
            configuration: builder.to_configuration(),
            removed,
        })
    }
}

//! Extension id allocation
//!
//! Extension records cannot be edited in place, so each scope/type pair
//! rotates through a small pool of ids rendered from an [`IdTemplate`].
//! A new install takes the first pool id the configuration does not
//! reference. The certificate reference of whichever record already sits in
//! the pool is carried forward so a certificate upload is not forced again.

use crate::builder::ExtensionConfigurationBuilder;
use crate::channel::ManagementChannel;
use crate::store::ExtensionStore;
use hsx_core::types::{DeploymentSlot, ExtensionKind, ExtensionRecord, ExtensionRoleScope};
use hsx_core::{Error, ExtensionSettings, IdTemplate, Result};
use tracing::debug;

/// Certificate reference supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRef {
    pub thumbprint: String,
    pub algorithm: Option<String>,
}

/// Outcome of an allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Id to register the new record under
    pub id: String,

    /// Record currently holding `id`. It must be deleted before the new
    /// record is added.
    pub stale_record: Option<ExtensionRecord>,

    pub thumbprint: Option<String>,
    pub thumbprint_algorithm: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExtensionIdAllocator {
    template: IdTemplate,
    pool_size: usize,
    default_algorithm: String,
}

impl ExtensionIdAllocator {
    pub fn new(
        template: IdTemplate,
        pool_size: usize,
        default_algorithm: impl Into<String>,
    ) -> Result<Self> {
        if pool_size == 0 {
            return Err(Error::invalid_config("rotation pool size must be at least 1"));
        }
        Ok(Self {
            template,
            pool_size,
            default_algorithm: default_algorithm.into(),
        })
    }

    pub fn from_settings(settings: &ExtensionSettings) -> Result<Self> {
        Self::new(
            settings.id_template.clone(),
            settings.pool_size,
            settings.thumbprint_algorithm.clone(),
        )
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Every id in the rotation pool for this scope and kind
    pub fn candidates(
        &self,
        scope: &ExtensionRoleScope,
        kind: &ExtensionKind,
        slot: DeploymentSlot,
    ) -> Vec<String> {
        self.template.candidates(scope, kind, slot, self.pool_size)
    }

    /// Pick the id for a new extension of `kind` in `scope`.
    ///
    /// Fails with `PoolExhausted` when every pool id is still referenced by
    /// the configuration, and with `TypeConflict` when the chosen id is held
    /// by a record of another kind.
    pub fn allocate<C: ManagementChannel + ?Sized>(
        &self,
        store: &ExtensionStore<'_, C>,
        builder: &ExtensionConfigurationBuilder,
        scope: &ExtensionRoleScope,
        kind: &ExtensionKind,
        slot: DeploymentSlot,
        certificate: Option<&CertificateRef>,
    ) -> Result<Allocation> {
        let candidates = self.candidates(scope, kind, slot);

        let id = candidates
            .iter()
            .find(|candidate| !builder.exist_any(candidate))
            .cloned()
            .ok_or_else(|| {
                Error::pool_exhausted(scope.label(), kind.to_string(), self.pool_size)
            })?;

        let existing = store.find_many(&candidates)?;

        let stale_record = existing.iter().find(|r| r.id == id).cloned();
        if let Some(stale) = &stale_record {
            if !stale.is_kind(kind) {
                return Err(Error::type_conflict(
                    &id,
                    kind.to_string(),
                    stale.kind.to_string(),
                ));
            }
        }

        // The stale record wins; otherwise borrow from any other pool record
        let donor = stale_record.as_ref().or_else(|| {
            existing
                .iter()
                .find(|r| r.id != id && r.is_kind(kind) && r.thumbprint.is_some())
        });

        let (thumbprint, thumbprint_algorithm) = match (certificate, donor) {
            (Some(cert), _) => (
                Some(cert.thumbprint.clone()),
                Some(
                    cert.algorithm
                        .clone()
                        .unwrap_or_else(|| self.default_algorithm.clone()),
                ),
            ),
            (None, Some(record)) if record.thumbprint.is_some() => (
                record.thumbprint.clone(),
                Some(
                    record
                        .thumbprint_algorithm
                        .clone()
                        .unwrap_or_else(|| self.default_algorithm.clone()),
                ),
            ),
            _ => (None, None),
        };

        debug!(
            "Allocated {} for {} in {} (stale record: {}, thumbprint: {})",
            id,
            kind,
            scope,
            stale_record.is_some(),
            thumbprint.as_deref().unwrap_or("none")
        );

        Ok(Allocation {
            id,
            stale_record,
            thumbprint,
            thumbprint_algorithm,
        })
    }
}

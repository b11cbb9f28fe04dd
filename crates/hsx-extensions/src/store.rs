//! Extension record accessor for one hosted service
//!
//! Thin wrapper over [`ManagementChannel`]. Nothing is cached: every call
//! reflects the remote state at the time it is made.

use crate::channel::ManagementChannel;
use hsx_core::types::{ExtensionKind, ExtensionRecord};
use hsx_core::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

pub struct ExtensionStore<'a, C: ManagementChannel + ?Sized> {
    channel: &'a C,
    service: String,
}

impl<'a, C: ManagementChannel + ?Sized> ExtensionStore<'a, C> {
    pub fn new(channel: &'a C, service: impl Into<String>) -> Self {
        Self {
            channel,
            service: service.into(),
        }
    }

    /// Hosted service this store reads and writes
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn list(&self) -> Result<Vec<ExtensionRecord>> {
        self.channel.list_extension_records(&self.service)
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Result<Option<ExtensionRecord>> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Look up a record by id, failing with `NotFound` when absent
    pub fn require(&self, id: &str) -> Result<ExtensionRecord> {
        self.get(id)?
            .ok_or_else(|| Error::not_found("extension", id))
    }

    /// Records for the given ids, in the order the ids are given.
    /// Ids with no record are skipped.
    pub fn find_many<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<ExtensionRecord>> {
        let mut by_id: HashMap<String, ExtensionRecord> =
            self.list()?.into_iter().map(|r| (r.id.clone(), r)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id.as_ref()))
            .collect())
    }

    /// Kind of every registered record, keyed by id
    pub fn kinds(&self) -> Result<HashMap<String, ExtensionKind>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|r| (r.id, r.kind))
            .collect())
    }

    pub fn add(&self, record: &ExtensionRecord) -> Result<()> {
        debug!("Adding extension record {} ({})", record.id, record.kind);
        self.channel.add_extension_record(&self.service, record)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        debug!("Deleting extension record {}", id);
        self.channel.delete_extension_record(&self.service, id)
    }
}

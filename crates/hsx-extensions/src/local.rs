//! File-backed management channel
//!
//! Keeps the control plane state as JSON on disk so the CLI can be used
//! without a remote endpoint. Each call takes a lock on a sibling `.lock`
//! file: shared for reads, exclusive for read-modify-write. Writes go to a
//! temp file that is renamed over the state file.

use crate::channel::{ChannelState, ManagementChannel};
use camino::{Utf8Path, Utf8PathBuf};
use fs4::fs_std::FileExt;
use hsx_core::types::{DeploymentSlot, DeploymentSnapshot, DeploymentUpdate, ExtensionRecord};
use hsx_core::Result;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalChannel {
    path: Utf8PathBuf,
}

impl LocalChannel {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Create (or replace) a deployment in the state file
    pub fn create_deployment(
        &self,
        service: &str,
        slot: DeploymentSlot,
        roles: Vec<String>,
    ) -> Result<()> {
        self.modify(|state| {
            state.create_deployment(service, slot, roles);
            Ok(())
        })
    }

    /// Full copy of the stored state
    pub fn state(&self) -> Result<ChannelState> {
        self.read(|state| Ok(state.clone()))
    }

    fn open_lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path.with_extension("lock"))?;
        Ok(file)
    }

    fn load(&self) -> Result<ChannelState> {
        if !self.path.exists() {
            return Ok(ChannelState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ChannelState::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&self, state: &ChannelState) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&temp_path)?;
            let json = serde_json::to_string_pretty(state)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;
        debug!("Wrote channel state to {}", self.path);
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&ChannelState) -> Result<T>) -> Result<T> {
        let lock = self.open_lock()?;
        FileExt::lock_shared(&lock)?;
        let state = self.load()?;
        f(&state)
        // Lock is released when `lock` is dropped
    }

    fn modify<T>(&self, f: impl FnOnce(&mut ChannelState) -> Result<T>) -> Result<T> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;
        let mut state = self.load()?;
        let value = f(&mut state)?;
        self.store(&state)?;
        Ok(value)
    }
}

impl ManagementChannel for LocalChannel {
    fn list_extension_records(&self, service: &str) -> Result<Vec<ExtensionRecord>> {
        self.read(|state| state.list_records(service))
    }

    fn add_extension_record(&self, service: &str, record: &ExtensionRecord) -> Result<()> {
        self.modify(|state| state.add_record(service, record))
    }

    fn delete_extension_record(&self, service: &str, id: &str) -> Result<()> {
        self.modify(|state| state.delete_record(service, id))
    }

    fn get_deployment(&self, service: &str, slot: DeploymentSlot) -> Result<DeploymentSnapshot> {
        self.read(|state| state.deployment(service, slot))
    }

    fn update_deployment(
        &self,
        service: &str,
        slot: DeploymentSlot,
        update: &DeploymentUpdate,
    ) -> Result<()> {
        self.modify(|state| state.apply_update(service, slot, update))
    }
}

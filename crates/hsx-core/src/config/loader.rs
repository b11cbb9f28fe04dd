//! Settings file loading and parsing

use super::IdTemplate;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Settings file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["hsx.yaml", "hsx.yml"];

/// Number of ids each scope/type pair rotates through
const DEFAULT_POOL_SIZE: usize = 2;

/// Algorithm recorded when a thumbprint is given without one
const DEFAULT_THUMBPRINT_ALGORITHM: &str = "sha1";

/// Settings that drive extension id allocation and the local channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtensionSettings {
    /// Size of the id rotation pool per scope and extension type
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    #[serde(default)]
    pub id_template: IdTemplate,

    #[serde(default = "default_thumbprint_algorithm")]
    pub thumbprint_algorithm: String,

    /// State file backing the local management channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<Utf8PathBuf>,
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_thumbprint_algorithm() -> String {
    DEFAULT_THUMBPRINT_ALGORITHM.to_string()
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            id_template: IdTemplate::default(),
            thumbprint_algorithm: default_thumbprint_algorithm(),
            state_file: None,
        }
    }
}

impl ExtensionSettings {
    /// Load settings from the given path, or search for a settings file
    /// starting at the current directory. Falls back to defaults when no
    /// file is found.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(p) = path {
            let content = fs::read_to_string(p).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::config_not_found(p.as_str())
                } else {
                    Error::Io(e)
                }
            })?;
            return Self::from_yaml(&content);
        }

        let cwd = std::env::current_dir().map_err(Error::Io)?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        match Self::find_config(&cwd)? {
            Some((found, content)) => {
                debug!("Loading settings from {}", found);
                Self::from_yaml(&content)
            }
            None => {
                debug!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate settings from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: ExtensionSettings = serde_yaml_ng::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Find a settings file in `start` or its parent directories
    pub fn find_config(start: &Utf8Path) -> Result<Option<(Utf8PathBuf, String)>> {
        let mut current = start;

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok(Some((path, content)));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::invalid_config("poolSize must be at least 1"));
        }
        if self.thumbprint_algorithm.trim().is_empty() {
            return Err(Error::invalid_config("thumbprintAlgorithm must not be empty"));
        }
        Ok(())
    }

    /// Path of the local channel state file (default: ~/.hsx/state.json)
    pub fn state_path(&self) -> Result<Utf8PathBuf> {
        if let Some(path) = &self.state_file {
            return Ok(path.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
        let home = Utf8PathBuf::try_from(home)
            .map_err(|_| Error::invalid_config("Home directory path is not valid UTF-8"))?;
        Ok(home.join(".hsx").join("state.json"))
    }
}

//! Configuration payloads for the built-in extension kinds

use crate::installer::{InstallRequest, RoleSelector};
use chrono::{DateTime, Months, SecondsFormat, Utc};
use hsx_core::types::ExtensionKind;
use hsx_core::{Error, Result};

/// Months a Remote Desktop account stays valid when no expiration is given
const DEFAULT_RDP_EXPIRATION_MONTHS: u32 = 6;

/// Escape text for inclusion in an XML element
pub fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remote Desktop account settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDesktopSettings {
    pub user_name: String,
    pub password: String,
    pub expiration: DateTime<Utc>,
}

impl RemoteDesktopSettings {
    /// Settings expiring six months from now
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_name: user_name.into(),
            password: password.into(),
            expiration: now
                .checked_add_months(Months::new(DEFAULT_RDP_EXPIRATION_MONTHS))
                .unwrap_or(now),
        }
    }

    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_name.trim().is_empty() {
            return Err(Error::invalid_config("Remote Desktop user name must not be empty"));
        }
        if self.password.is_empty() {
            return Err(Error::invalid_config("Remote Desktop password must not be empty"));
        }
        if self.expiration <= Utc::now() {
            return Err(Error::invalid_config(format!(
                "Remote Desktop expiration {} is in the past",
                self.expiration.to_rfc3339_opts(SecondsFormat::Secs, true)
            )));
        }
        Ok(())
    }

    pub fn public_configuration(&self) -> String {
        format!(
            "<PublicConfig><UserName>{}</UserName><Expiration>{}</Expiration></PublicConfig>",
            xml_escape(&self.user_name),
            self.expiration.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    pub fn private_configuration(&self) -> String {
        format!(
            "<PrivateConfig><Password>{}</Password></PrivateConfig>",
            xml_escape(&self.password)
        )
    }

    pub fn to_request(&self, selector: RoleSelector) -> Result<InstallRequest> {
        self.validate()?;
        Ok(InstallRequest::new(
            ExtensionKind::remote_desktop(),
            self.public_configuration(),
            self.private_configuration(),
            selector,
        ))
    }
}

/// Diagnostics agent settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsSettings {
    pub storage_account_name: String,
    pub storage_key: String,
    /// Raw `<WadCfg>` document, embedded as-is
    pub wad_config: Option<String>,
}

impl DiagnosticsSettings {
    pub fn new(storage_account_name: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            storage_account_name: storage_account_name.into(),
            storage_key: storage_key.into(),
            wad_config: None,
        }
    }

    pub fn with_wad_config(mut self, wad_config: impl Into<String>) -> Self {
        self.wad_config = Some(wad_config.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_account_name.trim().is_empty() {
            return Err(Error::invalid_config("storage account name must not be empty"));
        }
        if self.storage_key.trim().is_empty() {
            return Err(Error::invalid_config("storage key must not be empty"));
        }
        Ok(())
    }

    pub fn public_configuration(&self) -> String {
        format!(
            "<PublicConfig><StorageAccount>{}</StorageAccount>{}</PublicConfig>",
            xml_escape(&self.storage_account_name),
            self.wad_config.as_deref().map(str::trim).unwrap_or_default()
        )
    }

    pub fn private_configuration(&self) -> String {
        format!(
            "<PrivateConfig><StorageKey>{}</StorageKey></PrivateConfig>",
            xml_escape(&self.storage_key)
        )
    }

    pub fn to_request(&self, selector: RoleSelector) -> Result<InstallRequest> {
        self.validate()?;
        Ok(InstallRequest::new(
            ExtensionKind::diagnostics(),
            self.public_configuration(),
            self.private_configuration(),
            selector,
        ))
    }
}

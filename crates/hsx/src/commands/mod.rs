//! CLI command implementations

pub mod deployment;
pub mod diagnostics;
pub mod extension;
pub mod rdp;

use anyhow::{Context as _, Result};
use camino::Utf8PathBuf;
use hsx_core::types::{DeploymentSlot, ExtensionKind};
use hsx_core::ExtensionSettings;
use hsx_extensions::{ExtensionContext, ExtensionManager, InstallRequest, LocalChannel};

use crate::cli::{CertificateArgs, ShowArgs};
use crate::output;

/// Global options shared by every command
pub struct Context {
    config: Option<Utf8PathBuf>,
    state: Option<Utf8PathBuf>,
}

impl Context {
    pub fn new(config: Option<Utf8PathBuf>, state: Option<Utf8PathBuf>) -> Self {
        Self { config, state }
    }

    pub fn settings(&self) -> Result<ExtensionSettings> {
        ExtensionSettings::load(self.config.as_deref()).context("Failed to load hsx configuration")
    }

    /// Settings plus the channel over the configured state file.
    /// `--state` overrides the configured location.
    pub fn open(&self) -> Result<(ExtensionSettings, LocalChannel)> {
        let settings = self.settings()?;
        let path = match &self.state {
            Some(path) => path.clone(),
            None => settings.state_path()?,
        };
        tracing::debug!("Using state file {}", path);
        Ok((settings, LocalChannel::new(path)))
    }
}

/// Attach caller-supplied certificate options to an install request
pub(crate) fn with_certificate(request: InstallRequest, args: &CertificateArgs) -> InstallRequest {
    match &args.thumbprint {
        Some(thumbprint) => {
            request.with_certificate(thumbprint.as_str(), args.thumbprint_algorithm.clone())
        }
        None => request,
    }
}

/// Shared `show` implementation for a single extension kind
pub(crate) fn show_kind(ctx: &Context, args: &ShowArgs, kind: &ExtensionKind) -> Result<()> {
    let (settings, channel) = ctx.open()?;
    let manager = ExtensionManager::new(&channel, settings);
    let contexts = manager.describe(&args.target.service, args.target.slot, kind)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&contexts)?);
        return Ok(());
    }

    if contexts.is_empty() {
        output::info(&format!(
            "No {} extension enabled on {} ({})",
            kind, args.target.service, args.target.slot
        ));
        return Ok(());
    }

    for context in &contexts {
        print_context(context);
    }
    Ok(())
}

fn print_context(context: &ExtensionContext) {
    output::header(&format!("{} ({})", context.id, context.scope));
    output::kv("Type", &context.kind.to_string());
    output::kv("Settings", &context.public_configuration);
    if let Some(thumbprint) = &context.thumbprint {
        output::kv(
            "Certificate",
            &format!(
                "{} ({})",
                thumbprint,
                context.thumbprint_algorithm.as_deref().unwrap_or("unknown")
            ),
        );
    }
}

pub(crate) fn target_label(service: &str, slot: DeploymentSlot) -> String {
    format!("{} ({})", service, slot)
}

//! Diagnostics commands

use anyhow::{Context as _, Result};
use hsx_core::types::ExtensionKind;
use hsx_extensions::{DiagnosticsSettings, ExtensionManager, UninstallRequest};

use super::{show_kind, target_label, with_certificate, Context};
use crate::cli::{DiagnosticsCommands, DiagnosticsEnableArgs, DisableArgs};
use crate::output;

pub fn run(cmd: DiagnosticsCommands, ctx: &Context) -> Result<()> {
    match cmd {
        DiagnosticsCommands::Enable(args) => enable(args, ctx),
        DiagnosticsCommands::Disable(args) => disable(args, ctx),
        DiagnosticsCommands::Show(args) => show_kind(ctx, &args, &ExtensionKind::diagnostics()),
    }
}

fn enable(args: DiagnosticsEnableArgs, ctx: &Context) -> Result<()> {
    let mut settings = DiagnosticsSettings::new(&args.storage_account, &args.storage_key);
    if let Some(path) = &args.wad_config {
        let wad_config = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read WadCfg from {}", path))?;
        settings = settings.with_wad_config(wad_config);
    }
    let request = with_certificate(
        settings.to_request(args.roles.selector())?,
        &args.certificate,
    );

    let (config, channel) = ctx.open()?;
    let manager = ExtensionManager::new(&channel, config);
    manager.enable(&args.target.service, args.target.slot, &request)?;

    output::success(&format!(
        "Diagnostics enabled on {} (storage account {})",
        target_label(&args.target.service, args.target.slot),
        args.storage_account
    ));
    Ok(())
}

fn disable(args: DisableArgs, ctx: &Context) -> Result<()> {
    let request = UninstallRequest::new(ExtensionKind::diagnostics(), args.roles.selector());

    let (config, channel) = ctx.open()?;
    let manager = ExtensionManager::new(&channel, config);
    let outcome = manager.disable(&args.target.service, args.target.slot, &request)?;

    if outcome.is_noop() {
        output::info("Diagnostics is not enabled for the selected roles");
    } else {
        output::success(&format!(
            "Diagnostics disabled on {} ({} removed)",
            target_label(&args.target.service, args.target.slot),
            outcome.removed.join(", ")
        ));
    }
    Ok(())
}

//! Remote Desktop commands

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use hsx_core::types::ExtensionKind;
use hsx_extensions::{ExtensionManager, RemoteDesktopSettings, UninstallRequest};

use super::{show_kind, target_label, with_certificate, Context};
use crate::cli::{DisableArgs, RdpCommands, RdpEnableArgs};
use crate::output;

pub fn run(cmd: RdpCommands, ctx: &Context) -> Result<()> {
    match cmd {
        RdpCommands::Enable(args) => enable(args, ctx),
        RdpCommands::Disable(args) => disable(args, ctx),
        RdpCommands::Show(args) => show_kind(ctx, &args, &ExtensionKind::remote_desktop()),
    }
}

fn parse_expiration(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid expiration '{}', expected RFC 3339", value))?;
    Ok(parsed.with_timezone(&Utc))
}

fn enable(args: RdpEnableArgs, ctx: &Context) -> Result<()> {
    let mut settings = RemoteDesktopSettings::new(&args.user, &args.password);
    if let Some(expiration) = &args.expiration {
        settings = settings.with_expiration(parse_expiration(expiration)?);
    }
    let request = with_certificate(
        settings.to_request(args.roles.selector())?,
        &args.certificate,
    );

    let (config, channel) = ctx.open()?;
    let manager = ExtensionManager::new(&channel, config);
    manager.enable(&args.target.service, args.target.slot, &request)?;

    output::success(&format!(
        "Remote Desktop enabled on {} for user {}",
        target_label(&args.target.service, args.target.slot),
        args.user
    ));
    Ok(())
}

fn disable(args: DisableArgs, ctx: &Context) -> Result<()> {
    let request = UninstallRequest::new(ExtensionKind::remote_desktop(), args.roles.selector());

    let (config, channel) = ctx.open()?;
    let manager = ExtensionManager::new(&channel, config);
    let outcome = manager.disable(&args.target.service, args.target.slot, &request)?;

    if outcome.is_noop() {
        output::info("Remote Desktop is not enabled for the selected roles");
    } else {
        output::success(&format!(
            "Remote Desktop disabled on {}",
            target_label(&args.target.service, args.target.slot)
        ));
    }
    Ok(())
}

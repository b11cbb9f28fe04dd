//! Deployment commands

use anyhow::Result;
use hsx_extensions::ManagementChannel;

use super::{target_label, Context};
use crate::cli::{DeploymentCommands, DeploymentCreateArgs, ShowArgs};
use crate::output;

pub fn run(cmd: DeploymentCommands, ctx: &Context) -> Result<()> {
    match cmd {
        DeploymentCommands::Create(args) => create(args, ctx),
        DeploymentCommands::Show(args) => show(args, ctx),
    }
}

fn create(args: DeploymentCreateArgs, ctx: &Context) -> Result<()> {
    let (_, channel) = ctx.open()?;
    channel.create_deployment(&args.target.service, args.target.slot, args.roles.clone())?;
    output::success(&format!(
        "Created deployment {} with roles: {}",
        target_label(&args.target.service, args.target.slot),
        args.roles.join(", ")
    ));
    Ok(())
}

fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let (_, channel) = ctx.open()?;
    let deployment = channel.get_deployment(&args.target.service, args.target.slot)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&deployment)?);
        return Ok(());
    }

    output::header(&format!(
        "Deployment {}",
        target_label(&args.target.service, args.target.slot)
    ));
    output::kv("Roles", &deployment.roles.join(", "));
    println!(
        "{}",
        serde_json::to_string_pretty(&deployment.extension_configuration)?
    );
    Ok(())
}

//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use hsx_core::types::DeploymentSlot;
use hsx_extensions::RoleSelector;

/// hsx - Manage extensions on hosted service deployments
#[derive(Parser, Debug)]
#[command(name = "hsx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to hsx.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Path to the local control plane state file
    #[arg(long, global = true, env = "HSX_STATE")]
    pub state: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deployment management
    #[command(subcommand)]
    Deployment(DeploymentCommands),

    /// Remote Desktop extension
    #[command(subcommand)]
    Rdp(RdpCommands),

    /// Diagnostics extension
    #[command(subcommand)]
    Diagnostics(DiagnosticsCommands),

    /// Extension record management
    #[command(subcommand)]
    Extension(ExtensionCommands),
}

// Shared arguments

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Hosted service name
    #[arg(short, long)]
    pub service: String,

    /// Deployment slot (production, staging)
    #[arg(long, default_value = "production")]
    pub slot: DeploymentSlot,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RoleArgs {
    /// Target a named role (repeatable). Omit to target all roles.
    #[arg(short, long = "role")]
    pub roles: Vec<String>,

    /// Also target all roles when --role is given
    #[arg(long)]
    pub all_roles: bool,
}

impl RoleArgs {
    pub fn selector(&self) -> RoleSelector {
        RoleSelector {
            all_roles: self.all_roles || self.roles.is_empty(),
            roles: self.roles.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CertificateArgs {
    /// Thumbprint of an already uploaded certificate
    #[arg(long)]
    pub thumbprint: Option<String>,

    /// Thumbprint algorithm (defaults to the configured algorithm)
    #[arg(long, requires = "thumbprint")]
    pub thumbprint_algorithm: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DisableArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub roles: RoleArgs,
}

// Deployment commands

#[derive(Subcommand, Debug)]
pub enum DeploymentCommands {
    /// Create (or replace) a deployment in the local state
    Create(DeploymentCreateArgs),

    /// Show a deployment's extension configuration
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct DeploymentCreateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Role name (repeatable)
    #[arg(short, long = "role", required = true)]
    pub roles: Vec<String>,
}

// Remote Desktop commands

#[derive(Subcommand, Debug)]
pub enum RdpCommands {
    /// Enable Remote Desktop
    Enable(RdpEnableArgs),

    /// Disable Remote Desktop
    Disable(DisableArgs),

    /// Show Remote Desktop settings
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct RdpEnableArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub roles: RoleArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,

    /// Remote Desktop user name
    #[arg(short, long)]
    pub user: String,

    /// Remote Desktop password
    #[arg(short, long, env = "HSX_RDP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Account expiration (RFC 3339). Defaults to six months from now.
    #[arg(long)]
    pub expiration: Option<String>,
}

// Diagnostics commands

#[derive(Subcommand, Debug)]
pub enum DiagnosticsCommands {
    /// Enable the diagnostics agent
    Enable(DiagnosticsEnableArgs),

    /// Disable the diagnostics agent
    Disable(DisableArgs),

    /// Show diagnostics settings
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct DiagnosticsEnableArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub roles: RoleArgs,

    #[command(flatten)]
    pub certificate: CertificateArgs,

    /// Storage account receiving diagnostics data
    #[arg(long)]
    pub storage_account: String,

    /// Storage account key
    #[arg(long, env = "HSX_STORAGE_KEY", hide_env_values = true)]
    pub storage_key: String,

    /// Path to a WadCfg XML document
    #[arg(long)]
    pub wad_config: Option<Utf8PathBuf>,
}

// Extension record commands

#[derive(Subcommand, Debug)]
pub enum ExtensionCommands {
    /// List registered extension records
    List(ExtensionListArgs),

    /// Delete a registered extension record
    RemoveRecord(ExtensionRemoveRecordArgs),
}

#[derive(Args, Debug)]
pub struct ExtensionListArgs {
    /// Hosted service name
    #[arg(short, long)]
    pub service: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionRemoveRecordArgs {
    /// Hosted service name
    #[arg(short, long)]
    pub service: String,

    /// Extension record id
    #[arg(long)]
    pub id: String,
}

//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SettingsOverrides;

/// calsetup - Provision a Google Cloud service account for read-only Calendar access
#[derive(Debug, Parser)]
#[command(name = "calsetup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALSETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags overriding the provisioning settings.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    /// Cloud project id to create or reuse
    #[arg(long, global = true, env = "CALSETUP_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Display name for a newly created project
    #[arg(long, global = true, env = "CALSETUP_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Service account id (the part before `@`)
    #[arg(long, global = true, env = "CALSETUP_SERVICE_ACCOUNT")]
    pub service_account: Option<String>,

    /// Where to write the service account key
    #[arg(long, global = true, env = "CALSETUP_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Name or path of the gcloud executable
    #[arg(long, global = true, env = "CALSETUP_GCLOUD")]
    pub gcloud: Option<String>,
}

impl SettingsArgs {
    /// Converts the flags into configuration overrides.
    pub fn to_overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
            service_account: self.service_account.clone(),
            key_file: self.key_file.clone(),
            gcloud: self.gcloud.clone(),
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create whatever is missing and print the delegation instructions (default)
    Provision(ProvisionArgs),

    /// Check every step without changing anything
    Status,

    /// Print the OAuth client id from the key file
    ClientId,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for the provision command.
#[derive(Debug, Clone, Default, Args)]
pub struct ProvisionArgs {
    /// Open the Admin console delegation page in the browser
    #[arg(long)]
    pub open_console: bool,

    /// Copy the client id to the clipboard
    #[arg(long)]
    pub copy_client_id: bool,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

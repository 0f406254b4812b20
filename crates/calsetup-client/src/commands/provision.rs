//! Provision command.

use tracing::info;

use calsetup_core::{ProvisionSettings, render_delegation_instructions};
use calsetup_provision::Provisioner;

use crate::actions;
use crate::cli::ProvisionArgs;
use crate::config::ActionSettings;
use crate::error::ClientResult;

use super::print_report;

/// Runs the full procedure and prints the delegation instructions.
///
/// Actions requested on the command line or in `[actions]` run only after
/// every step succeeded.
pub async fn run(
    settings: ProvisionSettings,
    args: &ProvisionArgs,
    config_actions: &ActionSettings,
    json: bool,
) -> ClientResult<()> {
    let provisioner = Provisioner::system(settings);
    let settings = provisioner.settings();

    if !json {
        println!(
            "Provisioning service account {} in project {}",
            settings.service_account_email(),
            settings.project_id
        );
        println!();
    }

    let report = provisioner.provision().await?;
    info!(mutating = report.is_mutating(), "provisioning finished");

    let client_id = report.client_id.clone().unwrap_or_default();
    print_report(&report, json)?;
    if !json {
        println!();
        print!("{}", render_delegation_instructions(settings, &client_id));
    }

    if args.open_console || config_actions.open_console {
        actions::open_admin_console(&settings.admin_console_url)?;
    }
    if args.copy_client_id || config_actions.copy_client_id {
        actions::copy_client_id(&client_id)?;
        if !json {
            println!("Client ID copied to clipboard.");
        }
    }

    Ok(())
}

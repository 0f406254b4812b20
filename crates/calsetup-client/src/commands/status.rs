//! Status command.

use calsetup_core::ProvisionSettings;
use calsetup_provision::Provisioner;

use crate::error::ClientResult;

use super::print_report;

/// Reports which steps are already satisfied without changing anything.
pub async fn run(settings: ProvisionSettings, json: bool) -> ClientResult<()> {
    let provisioner = Provisioner::system(settings);
    let report = provisioner.status().await?;

    print_report(&report, json)?;
    if !json {
        println!();
        if report.is_complete() {
            println!("Everything is provisioned.");
        } else {
            println!("Run `calsetup provision` to create the missing resources.");
        }
        if let Some(ref client_id) = report.client_id {
            println!("Client ID: {}", client_id);
        }
    }

    Ok(())
}

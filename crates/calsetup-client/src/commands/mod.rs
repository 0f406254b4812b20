//! Subcommand implementations.

pub mod client_id;
pub mod config;
pub mod provision;
pub mod status;

use calsetup_core::ProvisionReport;

use crate::error::{ClientError, ClientResult};

/// Prints a report as step lines, or as pretty JSON.
pub(crate) fn print_report(report: &ProvisionReport, json: bool) -> ClientResult<()> {
    if json {
        let out = serde_json::to_string_pretty(report)
            .map_err(|e| ClientError::Config(format!("failed to serialize report: {}", e)))?;
        println!("{}", out);
    } else {
        for record in &report.steps {
            println!("{}", record.to_line());
        }
    }
    Ok(())
}

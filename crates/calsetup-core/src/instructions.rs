//! Operator instructions printed after provisioning.
//!
//! Domain-wide delegation cannot be granted from `gcloud`; an administrator
//! has to paste the client id and scopes into the Google Admin console.

use std::fmt::Write;

use crate::settings::ProvisionSettings;

/// Returns the cloud console page listing the project's service accounts.
pub fn service_account_console_url(project_id: &str) -> String {
    format!(
        "https://console.cloud.google.com/iam-admin/serviceaccounts?project={}",
        urlencoding::encode(project_id)
    )
}

/// Renders the manual domain-wide delegation instructions.
pub fn render_delegation_instructions(settings: &ProvisionSettings, client_id: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Domain-wide delegation (manual step)");
    let _ = writeln!(out);
    let _ = writeln!(out, "  1. Open {}", settings.admin_console_url);
    let _ = writeln!(out, "  2. Click \"Add new\" and enter:");
    let _ = writeln!(out, "       Client ID:    {}", client_id);
    let _ = writeln!(out, "       OAuth scopes: {}", settings.scopes_csv());
    let _ = writeln!(out, "  3. Click \"Authorize\".");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Service account: {}",
        settings.service_account_email()
    );
    let _ = writeln!(out, "Key file:        {}", settings.key_file.display());
    let _ = writeln!(
        out,
        "Console:         {}",
        service_account_console_url(&settings.project_id)
    );
    out
}

//! Post-provisioning actions: open the Admin console, copy the client id.

use tracing::info;

use crate::error::{ClientError, ClientResult};

/// Opens the Admin console delegation page in the default browser.
pub fn open_admin_console(url: &str) -> ClientResult<()> {
    info!(url = %url, "opening Admin console");
    open::that(url).map_err(|e| ClientError::Action(format!("failed to open URL: {}", e)))?;
    Ok(())
}

/// Copies the client id to the clipboard.
pub fn copy_client_id(client_id: &str) -> ClientResult<()> {
    info!(client_id = %client_id, "copying client id to clipboard");

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| ClientError::Action(format!("failed to access clipboard: {}", e)))?;

    clipboard
        .set_text(client_id)
        .map_err(|e| ClientError::Action(format!("failed to copy to clipboard: {}", e)))?;

    Ok(())
}

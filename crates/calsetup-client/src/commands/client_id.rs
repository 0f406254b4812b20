//! Client id command.

use calsetup_core::{ProvisionSettings, ServiceAccountKey};

use crate::error::ClientResult;

/// Prints the OAuth client id stored in the key file.
pub fn run(settings: &ProvisionSettings) -> ClientResult<()> {
    let key = ServiceAccountKey::from_file(&settings.key_file)?;
    println!("{}", key.client_id());
    Ok(())
}

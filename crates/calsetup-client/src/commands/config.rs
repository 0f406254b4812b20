//! Configuration commands.

use std::path::Path;

use calsetup_core::ProvisionSettings;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the effective configuration to stdout.
pub fn dump(
    config: &ClientConfig,
    settings: &ProvisionSettings,
    config_path: &Path,
) -> ClientResult<()> {
    let mut effective = config.clone();
    effective.provision = settings.clone();
    let toml_str = toml::to_string_pretty(&effective)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", config_path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the effective provisioning settings.
pub fn validate(settings: &ProvisionSettings) -> ClientResult<()> {
    settings
        .validate()
        .map_err(|e| ClientError::Config(e.to_string()))?;

    println!("Configuration is valid.");
    println!("Service account: {}", settings.service_account_email());
    Ok(())
}

/// Show the configuration file path.
pub fn path(config_path: &Path) -> ClientResult<()> {
    println!("config: {}", config_path.display());
    Ok(())
}

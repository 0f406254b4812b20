//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calsetup/config.toml` by default. Every key is optional;
//! missing keys fall back to the built-in defaults.
//!
//! ```toml
//! [provision]
//! project_id = "acme-calendar-sync"
//! service_account_name = "meetings-reader"
//! key_file = "secrets/google_sa_key.json"
//!
//! [actions]
//! open_console = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use calsetup_core::ProvisionSettings;

/// Configuration for the calsetup client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Provisioning settings.
    #[serde(default)]
    pub provision: ProvisionSettings,

    /// Post-provisioning actions.
    #[serde(default)]
    pub actions: ActionSettings,
}

/// What to do with the result once provisioning succeeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionSettings {
    /// Open the Admin console delegation page in the browser.
    pub open_console: bool,

    /// Copy the client id to the clipboard.
    pub copy_client_id: bool,
}

/// Per-invocation overrides from CLI flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Cloud project id.
    pub project_id: Option<String>,
    /// Project display name.
    pub project_name: Option<String>,
    /// Service account id.
    pub service_account: Option<String>,
    /// Key file path.
    pub key_file: Option<PathBuf>,
    /// `gcloud` executable.
    pub gcloud: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calsetup")
    }

    /// Returns the provisioning settings with overrides applied.
    ///
    /// Precedence: CLI flags / environment, then `config.toml`, then defaults.
    pub fn resolve_settings(&self, overrides: &SettingsOverrides) -> ProvisionSettings {
        let mut settings = self.provision.clone();
        if let Some(ref id) = overrides.project_id {
            settings.project_id = id.clone();
        }
        if let Some(ref name) = overrides.project_name {
            settings.project_name = name.clone();
        }
        if let Some(ref account) = overrides.service_account {
            settings.service_account_name = account.clone();
        }
        if let Some(ref path) = overrides.key_file {
            settings.key_file = path.clone();
        }
        if let Some(ref gcloud) = overrides.gcloud {
            settings.gcloud_binary = gcloud.clone();
        }
        settings
    }
}

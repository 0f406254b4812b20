//! Provisioning settings.
//!
//! These are the handful of constants the procedure works with: which
//! project to create, which service account to create in it, which API to
//! enable and where to write the downloaded key.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SetupError, SetupResult};

/// Project and service account ids: 6-30 chars, lowercase letter first,
/// no trailing hyphen.
static GCP_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$").expect("Invalid GCP id regex"));

/// Settings for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionSettings {
    /// Cloud project id to create or reuse.
    pub project_id: String,

    /// Human-readable project name used at creation time.
    pub project_name: String,

    /// Service account id (the part before `@`).
    pub service_account_name: String,

    /// Display name given to the service account at creation time.
    pub service_account_display_name: String,

    /// API to enable on the project.
    pub api: String,

    /// Where the JSON key is written.
    pub key_file: PathBuf,

    /// OAuth scopes the operator grants in the Admin console.
    pub scopes: Vec<String>,

    /// Name or path of the `gcloud` executable.
    pub gcloud_binary: String,

    /// Admin console page where domain-wide delegation is configured.
    pub admin_console_url: String,
}

impl ProvisionSettings {
    /// Default project id.
    pub const DEFAULT_PROJECT_ID: &'static str = "calendar-meetings-reader";

    /// Default service account id.
    pub const DEFAULT_SERVICE_ACCOUNT: &'static str = "calendar-reader";

    /// Calendar API service name.
    pub const DEFAULT_API: &'static str = "calendar-json.googleapis.com";

    /// Default key file name, relative to the working directory.
    pub const DEFAULT_KEY_FILE: &'static str = "google_sa_key.json";

    /// Read-only calendar scope.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar.readonly";

    /// Domain-wide delegation page of the Google Admin console.
    pub const DEFAULT_ADMIN_CONSOLE_URL: &'static str =
        "https://admin.google.com/ac/owl/domainwidedelegation";

    /// Returns the email of the service account.
    pub fn service_account_email(&self) -> String {
        format!(
            "{}@{}.iam.gserviceaccount.com",
            self.service_account_name, self.project_id
        )
    }

    /// Returns the scopes joined the way the Admin console expects them.
    pub fn scopes_csv(&self) -> String {
        self.scopes.join(",")
    }

    /// Builder method to set the project id.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Builder method to set the service account id.
    pub fn with_service_account_name(mut self, name: impl Into<String>) -> Self {
        self.service_account_name = name.into();
        self
    }

    /// Builder method to set the key file path.
    pub fn with_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = path.into();
        self
    }

    /// Validates the settings before any command is run.
    ///
    /// This checks that:
    /// - the project id and service account id are valid GCP identifiers
    /// - names, API and key file are non-empty
    /// - the key file path is valid UTF-8, since it is passed to `gcloud` as text
    /// - at least one scope is configured
    /// - the admin console URL is an `https` URL
    pub fn validate(&self) -> SetupResult<()> {
        if !GCP_ID_REGEX.is_match(&self.project_id) {
            return Err(SetupError::InvalidSettings(format!(
                "project id `{}` must be 6-30 lowercase letters, digits or hyphens, \
                 start with a letter and not end with a hyphen",
                self.project_id
            )));
        }
        if !GCP_ID_REGEX.is_match(&self.service_account_name) {
            return Err(SetupError::InvalidSettings(format!(
                "service account name `{}` must be 6-30 lowercase letters, digits or hyphens, \
                 start with a letter and not end with a hyphen",
                self.service_account_name
            )));
        }
        if self.project_name.trim().is_empty() {
            return Err(SetupError::InvalidSettings(
                "project name must not be empty".into(),
            ));
        }
        if self.api.trim().is_empty() {
            return Err(SetupError::InvalidSettings("api must not be empty".into()));
        }
        if self.key_file.as_os_str().is_empty() {
            return Err(SetupError::InvalidSettings(
                "key file path must not be empty".into(),
            ));
        }
        if self.key_file.to_str().is_none() {
            return Err(SetupError::InvalidSettings(format!(
                "key file path `{}` is not valid UTF-8",
                self.key_file.display()
            )));
        }
        if self.gcloud_binary.trim().is_empty() {
            return Err(SetupError::InvalidSettings(
                "gcloud binary must not be empty".into(),
            ));
        }
        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(SetupError::InvalidSettings(
                "at least one scope is required".into(),
            ));
        }

        let url = Url::parse(&self.admin_console_url).map_err(|e| {
            SetupError::InvalidSettings(format!(
                "admin console URL `{}` is invalid: {}",
                self.admin_console_url, e
            ))
        })?;
        if url.scheme() != "https" {
            return Err(SetupError::InvalidSettings(format!(
                "admin console URL `{}` must use https",
                self.admin_console_url
            )));
        }

        Ok(())
    }
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            project_id: Self::DEFAULT_PROJECT_ID.to_string(),
            project_name: "Calendar Meetings Reader".to_string(),
            service_account_name: Self::DEFAULT_SERVICE_ACCOUNT.to_string(),
            service_account_display_name: "Calendar read-only reader".to_string(),
            api: Self::DEFAULT_API.to_string(),
            key_file: PathBuf::from(Self::DEFAULT_KEY_FILE),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            gcloud_binary: "gcloud".to_string(),
            admin_console_url: Self::DEFAULT_ADMIN_CONSOLE_URL.to_string(),
        }
    }
}

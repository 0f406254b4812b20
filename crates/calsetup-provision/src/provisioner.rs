//! The provisioning procedure.
//!
//! Every step checks whether its resource is present and only creates it
//! when it is not, so running the procedure again once everything exists
//! issues read-only commands only. Steps run strictly in order and the
//! first error aborts the run; nothing is rolled back.

use std::path::Path;

use tracing::{info, warn};

use calsetup_core::{
    ProvisionReport, ProvisionSettings, ServiceAccountKey, SetupError, SetupResult, Step,
    StepOutcome,
};

use crate::gcloud::Gcloud;
use crate::runner::{CommandRunner, SystemRunner};

/// Drives `gcloud` through the provisioning steps.
pub struct Provisioner {
    settings: ProvisionSettings,
    runner: Box<dyn CommandRunner>,
}

impl Provisioner {
    /// Creates a provisioner with the given command runner.
    pub fn new(settings: ProvisionSettings, runner: impl CommandRunner + 'static) -> Self {
        Self {
            settings,
            runner: Box::new(runner),
        }
    }

    /// Creates a provisioner that runs commands on the local system.
    pub fn system(settings: ProvisionSettings) -> Self {
        Self::new(settings, SystemRunner::new())
    }

    /// Returns the settings this provisioner uses.
    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    fn gcloud(&self) -> Gcloud<'_> {
        Gcloud::new(self.runner.as_ref(), &self.settings.gcloud_binary)
    }

    /// Fails with [`SetupError::ToolMissing`] unless `gcloud` can be found.
    fn check_tool(&self, report: &mut ProvisionReport) -> SetupResult<()> {
        let binary = &self.settings.gcloud_binary;
        match self.runner.locate(binary) {
            Some(path) => {
                info!(path = %path.display(), "found gcloud");
                report.record(
                    Step::CheckTool,
                    StepOutcome::AlreadyPresent,
                    path.display().to_string(),
                );
                Ok(())
            }
            None => Err(SetupError::ToolMissing {
                tool: binary.clone(),
            }),
        }
    }

    /// Runs every step, creating whatever is missing.
    pub async fn provision(&self) -> SetupResult<ProvisionReport> {
        self.settings.validate()?;

        let settings = &self.settings;
        let gcloud = self.gcloud();
        let mut report = ProvisionReport::new();

        self.check_tool(&mut report)?;

        match gcloud.active_account().await? {
            Some(account) => {
                info!(%account, "already authenticated");
                report.record(Step::Authenticate, StepOutcome::AlreadyPresent, account);
            }
            None => {
                info!("no active account, starting login");
                gcloud.login().await?;
                let account = gcloud.active_account().await?.unwrap_or_default();
                report.record(Step::Authenticate, StepOutcome::Created, account);
            }
        }

        let project_id = settings.project_id.as_str();
        if gcloud.project_exists(project_id).await? {
            info!(project_id, "project already exists");
            report.record(Step::EnsureProject, StepOutcome::AlreadyPresent, project_id);
        } else {
            info!(project_id, "creating project");
            gcloud
                .create_project(project_id, &settings.project_name)
                .await?;
            report.record(Step::EnsureProject, StepOutcome::Created, project_id);
        }

        let api = settings.api.as_str();
        if gcloud.api_enabled(project_id, api).await? {
            info!(api, "API already enabled");
            report.record(Step::EnableApi, StepOutcome::AlreadyPresent, api);
        } else {
            info!(api, "enabling API");
            gcloud.enable_api(project_id, api).await?;
            report.record(Step::EnableApi, StepOutcome::Created, api);
        }

        let email = settings.service_account_email();
        if gcloud.service_account_exists(project_id, &email).await? {
            info!(%email, "service account already exists");
            report.record(
                Step::EnsureServiceAccount,
                StepOutcome::AlreadyPresent,
                email.as_str(),
            );
        } else {
            info!(%email, "creating service account");
            gcloud
                .create_service_account(
                    project_id,
                    &settings.service_account_name,
                    &settings.service_account_display_name,
                )
                .await?;
            report.record(Step::EnsureServiceAccount, StepOutcome::Created, email.as_str());
        }

        let key_file = settings.key_file.as_path();
        let key_detail = key_file.display().to_string();
        if tokio::fs::try_exists(key_file).await? {
            info!(path = %key_detail, "key file already exists");
            report.record(Step::EnsureKeyFile, StepOutcome::AlreadyPresent, key_detail);
        } else {
            info!(path = %key_detail, "creating key");
            if let Some(parent) = key_file.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            gcloud.create_key(project_id, &email, key_file).await?;
            restrict_permissions(key_file).await;
            report.record(Step::EnsureKeyFile, StepOutcome::Created, key_detail);
        }

        report.client_id = Some(self.read_client_id(key_file, &email)?);
        Ok(report)
    }

    /// Runs every check without changing anything.
    ///
    /// Missing resources are reported as [`StepOutcome::Missing`]. Without
    /// an active account the remote checks cannot run, so the report stops
    /// after the authentication step.
    pub async fn status(&self) -> SetupResult<ProvisionReport> {
        self.settings.validate()?;

        let settings = &self.settings;
        let gcloud = self.gcloud();
        let mut report = ProvisionReport::new();

        self.check_tool(&mut report)?;

        match gcloud.active_account().await? {
            Some(account) => {
                report.record(Step::Authenticate, StepOutcome::AlreadyPresent, account);
            }
            None => {
                report.record(Step::Authenticate, StepOutcome::Missing, "");
                return Ok(report);
            }
        }

        let project_id = settings.project_id.as_str();
        let email = settings.service_account_email();
        if gcloud.project_exists(project_id).await? {
            report.record(Step::EnsureProject, StepOutcome::AlreadyPresent, project_id);

            let api_outcome = presence(gcloud.api_enabled(project_id, &settings.api).await?);
            report.record(Step::EnableApi, api_outcome, settings.api.as_str());

            let account_outcome =
                presence(gcloud.service_account_exists(project_id, &email).await?);
            report.record(Step::EnsureServiceAccount, account_outcome, email.as_str());
        } else {
            report.record(Step::EnsureProject, StepOutcome::Missing, project_id);
            report.record(Step::EnableApi, StepOutcome::Missing, settings.api.as_str());
            report.record(
                Step::EnsureServiceAccount,
                StepOutcome::Missing,
                email.as_str(),
            );
        }

        let key_file = settings.key_file.as_path();
        if tokio::fs::try_exists(key_file).await? {
            report.record(
                Step::EnsureKeyFile,
                StepOutcome::AlreadyPresent,
                key_file.display().to_string(),
            );
            report.client_id = Some(self.read_client_id(key_file, &email)?);
        } else {
            report.record(
                Step::EnsureKeyFile,
                StepOutcome::Missing,
                key_file.display().to_string(),
            );
        }

        Ok(report)
    }

    fn read_client_id(&self, key_file: &Path, email: &str) -> SetupResult<String> {
        let key = ServiceAccountKey::from_file(key_file)?;
        if !key.belongs_to(email) {
            warn!(
                path = %key_file.display(),
                expected = email,
                found = key.client_email.as_deref().unwrap_or("<none>"),
                "key file was issued for a different service account"
            );
        }
        Ok(key.client_id().to_string())
    }
}

fn presence(exists: bool) -> StepOutcome {
    if exists {
        StepOutcome::AlreadyPresent
    } else {
        StepOutcome::Missing
    }
}

/// Makes a freshly written key readable by its owner only.
async fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        if let Err(e) = tokio::fs::set_permissions(path, perms).await {
            warn!(path = %path.display(), error = %e, "could not restrict key file permissions");
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}

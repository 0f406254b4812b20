//! Typed `gcloud` operations.
//!
//! Presence checks return `bool`/`Option` and treat a non-zero exit as
//! "absent". Mutating operations turn a non-zero exit into
//! [`SetupError::CommandFailed`].

use std::path::Path;

use tracing::debug;

use calsetup_core::{SetupError, SetupResult};

use crate::runner::{CommandOutput, CommandRunner, command_line};

/// A `gcloud` executable driven through a [`CommandRunner`].
pub struct Gcloud<'a> {
    runner: &'a dyn CommandRunner,
    binary: &'a str,
}

impl<'a> Gcloud<'a> {
    /// Creates a wrapper around the given executable.
    pub fn new(runner: &'a dyn CommandRunner, binary: &'a str) -> Self {
        Self { runner, binary }
    }

    /// Runs a non-interactive command; prompts are disabled with `--quiet`.
    async fn run(&self, args: &[&str]) -> SetupResult<CommandOutput> {
        let mut args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        args.push("--quiet".to_string());
        self.runner.capture(self.binary, &args).await
    }

    /// Runs a command and fails on non-zero exit.
    async fn run_checked(&self, args: &[&str]) -> SetupResult<CommandOutput> {
        let output = self.run(args).await?;
        if output.success() {
            return Ok(output);
        }
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Err(SetupError::CommandFailed {
            command: command_line(self.binary, &args),
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        })
    }

    /// Returns the active account, if any.
    pub async fn active_account(&self) -> SetupResult<Option<String>> {
        let output = self
            .run_checked(&[
                "auth",
                "list",
                "--filter=status:ACTIVE",
                "--format=value(account)",
            ])
            .await?;
        Ok(output.stdout_lines().next().map(str::to_string))
    }

    /// Runs the browser login flow attached to the terminal.
    pub async fn login(&self) -> SetupResult<()> {
        let args = vec!["auth".to_string(), "login".to_string()];
        let status = self.runner.interactive(self.binary, &args).await?;
        if status == Some(0) {
            Ok(())
        } else {
            Err(SetupError::CommandFailed {
                command: command_line(self.binary, &args),
                status,
                stderr: String::new(),
            })
        }
    }

    /// Returns true if the project can be described.
    pub async fn project_exists(&self, project_id: &str) -> SetupResult<bool> {
        let output = self
            .run(&["projects", "describe", project_id, "--format=value(projectId)"])
            .await?;
        if !output.success() {
            debug!(project_id, stderr = %output.stderr.trim(), "project not describable");
        }
        Ok(output.success())
    }

    /// Creates a project.
    pub async fn create_project(&self, project_id: &str, name: &str) -> SetupResult<()> {
        let name = format!("--name={}", name);
        self.run_checked(&["projects", "create", project_id, &name])
            .await?;
        Ok(())
    }

    /// Returns true if the API is enabled on the project.
    pub async fn api_enabled(&self, project_id: &str, api: &str) -> SetupResult<bool> {
        let project = format!("--project={}", project_id);
        let filter = format!("--filter=config.name={}", api);
        let output = self
            .run_checked(&[
                "services",
                "list",
                "--enabled",
                &project,
                &filter,
                "--format=value(config.name)",
            ])
            .await?;
        Ok(output.stdout_lines().any(|line| line == api))
    }

    /// Enables an API on the project.
    pub async fn enable_api(&self, project_id: &str, api: &str) -> SetupResult<()> {
        let project = format!("--project={}", project_id);
        self.run_checked(&["services", "enable", api, &project])
            .await?;
        Ok(())
    }

    /// Returns true if the service account can be described.
    pub async fn service_account_exists(&self, project_id: &str, email: &str) -> SetupResult<bool> {
        let project = format!("--project={}", project_id);
        let output = self
            .run(&[
                "iam",
                "service-accounts",
                "describe",
                email,
                &project,
                "--format=value(email)",
            ])
            .await?;
        Ok(output.success())
    }

    /// Creates a service account.
    pub async fn create_service_account(
        &self,
        project_id: &str,
        name: &str,
        display_name: &str,
    ) -> SetupResult<()> {
        let display = format!("--display-name={}", display_name);
        let project = format!("--project={}", project_id);
        self.run_checked(&["iam", "service-accounts", "create", name, &display, &project])
            .await?;
        Ok(())
    }

    /// Creates a new JSON key for the service account and writes it to `path`.
    pub async fn create_key(&self, project_id: &str, email: &str, path: &Path) -> SetupResult<()> {
        let path = path.to_str().ok_or_else(|| {
            SetupError::InvalidSettings(format!(
                "key file path `{}` is not valid UTF-8",
                path.display()
            ))
        })?;
        let account = format!("--iam-account={}", email);
        let project = format!("--project={}", project_id);
        self.run_checked(&[
            "iam",
            "service-accounts",
            "keys",
            "create",
            path,
            &account,
            &project,
        ])
        .await?;
        Ok(())
    }
}

//! Provisioning steps and their outcomes.

use std::fmt;

use serde::Serialize;

/// One step of the provisioning procedure, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Check that `gcloud` is installed.
    CheckTool,
    /// Ensure an authenticated `gcloud` account.
    Authenticate,
    /// Ensure the cloud project exists.
    EnsureProject,
    /// Ensure the API is enabled on the project.
    EnableApi,
    /// Ensure the service account exists.
    EnsureServiceAccount,
    /// Ensure the key file exists on disk.
    EnsureKeyFile,
}

impl Step {
    /// All steps, in the order they run.
    pub const ALL: [Step; 6] = [
        Step::CheckTool,
        Step::Authenticate,
        Step::EnsureProject,
        Step::EnableApi,
        Step::EnsureServiceAccount,
        Step::EnsureKeyFile,
    ];

    /// Returns a short label for terminal output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CheckTool => "gcloud CLI",
            Self::Authenticate => "authentication",
            Self::EnsureProject => "project",
            Self::EnableApi => "API",
            Self::EnsureServiceAccount => "service account",
            Self::EnsureKeyFile => "key file",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a step found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The resource was already there; nothing was changed.
    AlreadyPresent,
    /// The resource was created by this run.
    Created,
    /// The resource is absent and would be created (status checks only).
    Missing,
}

impl StepOutcome {
    /// Returns the bracketed tag printed in front of a step line.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::AlreadyPresent => "[ok]",
            Self::Created => "[created]",
            Self::Missing => "[missing]",
        }
    }
}

/// The outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Which step ran.
    pub step: Step,
    /// What it found or did.
    pub outcome: StepOutcome,
    /// Resource the step is about (account, project id, path...).
    pub detail: String,
}

impl StepRecord {
    /// Creates a new step record.
    pub fn new(step: Step, outcome: StepOutcome, detail: impl Into<String>) -> Self {
        Self {
            step,
            outcome,
            detail: detail.into(),
        }
    }

    /// Renders the record as one terminal line.
    pub fn to_line(&self) -> String {
        let verb = match self.outcome {
            StepOutcome::AlreadyPresent => "already exists",
            StepOutcome::Created => "created",
            StepOutcome::Missing => "not found",
        };
        match self.step {
            Step::CheckTool => match self.outcome {
                StepOutcome::Missing => format!("{} {} not installed", self.outcome.tag(), self.step),
                _ => format!("{} {} found at {}", self.outcome.tag(), self.step, self.detail),
            },
            Step::Authenticate => match self.outcome {
                StepOutcome::AlreadyPresent => {
                    format!("{} logged in as {}", self.outcome.tag(), self.detail)
                }
                StepOutcome::Created => format!("{} logged in", self.outcome.tag()),
                StepOutcome::Missing => format!("{} no active account", self.outcome.tag()),
            },
            Step::EnableApi => {
                let verb = match self.outcome {
                    StepOutcome::AlreadyPresent => "already enabled",
                    StepOutcome::Created => "enabled",
                    StepOutcome::Missing => "not enabled",
                };
                format!("{} {} {} {}", self.outcome.tag(), self.step, self.detail, verb)
            }
            _ => format!("{} {} {} {}", self.outcome.tag(), self.step, self.detail, verb),
        }
    }
}

/// The result of a provisioning or status run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    /// Steps in execution order.
    pub steps: Vec<StepRecord>,
    /// Client id read from the key file, when one is available.
    pub client_id: Option<String>,
}

impl ProvisionReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step record.
    pub fn record(&mut self, step: Step, outcome: StepOutcome, detail: impl Into<String>) {
        self.steps.push(StepRecord::new(step, outcome, detail));
    }

    /// Returns the outcome of a step, if it ran.
    pub fn outcome(&self, step: Step) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| r.outcome)
    }

    /// Returns true if any step created something.
    pub fn is_mutating(&self) -> bool {
        self.steps.iter().any(|r| r.outcome == StepOutcome::Created)
    }

    /// Returns true if every step that ran found its resource in place.
    pub fn is_complete(&self) -> bool {
        self.steps.len() == Step::ALL.len()
            && self
                .steps
                .iter()
                .all(|r| r.outcome != StepOutcome::Missing)
    }
}

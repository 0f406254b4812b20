//! Core types: settings, key file, reports, instructions, tracing

pub mod error;
pub mod instructions;
pub mod keyfile;
pub mod report;
pub mod settings;
pub mod tracing;

pub use error::{GCLOUD_INSTALL_URL, SetupError, SetupResult};
pub use instructions::{render_delegation_instructions, service_account_console_url};
pub use keyfile::ServiceAccountKey;
pub use report::{ProvisionReport, Step, StepOutcome, StepRecord};
pub use settings::ProvisionSettings;
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

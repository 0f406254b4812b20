//! Command runner, gcloud operations and the provisioning procedure
//!
//! This crate drives the `gcloud` CLI to bring a project, the Calendar API,
//! a service account and its key into existence.

pub mod gcloud;
pub mod provisioner;
pub mod runner;

#[cfg(test)]
mod fake;

pub use gcloud::Gcloud;
pub use provisioner::Provisioner;
pub use runner::{BoxFuture, CommandOutput, CommandRunner, SystemRunner, command_line};

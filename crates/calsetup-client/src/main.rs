//! calsetup CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use calsetup_client::cli::{Cli, Command, ConfigAction, ProvisionArgs};
use calsetup_client::commands;
use calsetup_client::config::ClientConfig;
use calsetup_client::error::{ClientError, ClientResult};
use calsetup_core::{TracingConfig, TracingOutputFormat, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    let tracing_config = if cli.log_json {
        tracing_config.with_format(TracingOutputFormat::Json)
    } else {
        tracing_config
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    // Run the command
    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Returns the configuration file in effect: `--config` or the default path.
fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(ClientConfig::default_path)
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config),
        None => ClientConfig::load().map_err(ClientError::Config),
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    let settings = config.resolve_settings(&cli.settings.to_overrides());
    let config_path = config_path(&cli);

    match cli.command {
        None => {
            commands::provision::run(settings, &ProvisionArgs::default(), &config.actions, cli.json)
                .await
        }
        Some(Command::Provision(args)) => {
            commands::provision::run(settings, &args, &config.actions, cli.json).await
        }
        Some(Command::Status) => commands::status::run(settings, cli.json).await,
        Some(Command::ClientId) => commands::client_id::run(&settings),
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &settings, &config_path),
            ConfigAction::Validate => commands::config::validate(&settings),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}

//! infraprov - provision workspace runtimes onto container infrastructure
//!
//! Loads configuration, assembles the provisioning pipeline, and runs it over
//! the workspace environment given on the command line.

mod cli;
mod error;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use chrono::{DateTime, Utc};
use clap::Parser;
use infraprov_config::Config;
use infraprov_provision::default_pipeline;
use infraprov_types::{
    Container, InfrastructureEnvironment, Pod, RuntimeIdentity, StagePhase, WorkspaceEnvironment,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::process;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting infraprov v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults), 2. environment variables
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;

    match cli.command {
        Commands::Provision {
            environment,
            seed,
            workspace_id,
            owner,
            env_name,
        } => {
            let env: WorkspaceEnvironment = read_json(&environment).await?;
            let mut target = match seed {
                Some(path) => read_json(&path).await?,
                None => seed_from_machines(&env),
            };
            let identity = RuntimeIdentity::new(workspace_id, owner, env_name);

            let pipeline = default_pipeline(&config)?;
            pipeline.provision(&env, &mut target, &identity)?;

            let report = ProvisionReport {
                workspace_id: identity.workspace_id(),
                owner: identity.owner(),
                env_name: identity.env_name(),
                stages: pipeline.stage_names().collect(),
                provisioned_at: Utc::now(),
                environment: &target,
            };
            if cli.global.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        Commands::Stages => {
            let pipeline = default_pipeline(&config)?;
            let stages: Vec<StageRow<'_>> = pipeline
                .stages()
                .iter()
                .map(|stage| StageRow {
                    name: stage.name(),
                    phase: stage.phase(),
                })
                .collect();

            if cli.global.json {
                println!("{}", serde_json::to_string(&stages)?);
            } else {
                for (position, stage) in stages.iter().enumerate() {
                    println!("{:>2}. {:<16} {}", position + 1, stage.name, stage.phase);
                }
            }
        }
    }

    info!("Command completed successfully");
    Ok(())
}

#[derive(Serialize)]
struct ProvisionReport<'a> {
    workspace_id: &'a str,
    owner: &'a str,
    env_name: &'a str,
    stages: Vec<&'a str>,
    provisioned_at: DateTime<Utc>,
    environment: &'a InfrastructureEnvironment,
}

#[derive(Serialize)]
struct StageRow<'a> {
    name: &'a str,
    phase: StagePhase,
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| infraprov_errors::Error::io_with_path(&e, path))?;
    serde_json::from_str(&contents).map_err(|error| CliError::Input {
        path: path.to_path_buf(),
        error,
    })
}

/// One pod per machine key prefix, one container per machine
fn seed_from_machines(env: &WorkspaceEnvironment) -> InfrastructureEnvironment {
    let mut target = InfrastructureEnvironment::new();
    for key in env.machines.keys() {
        let Some((pod, container)) = key.split_once('/') else {
            tracing::warn!(machine = %key, "machine key is not '<pod>/<container>', skipped");
            continue;
        };
        target
            .pods
            .entry(pod.to_string())
            .or_insert_with(|| Pod::new(pod))
            .containers
            .push(Container::new(container));
    }
    target
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let default_filter = if debug_enabled_flag {
        "info,infraprov=debug,infraprov_provision=debug,infraprov_config=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // stdout carries only the result document
    if json_mode {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(debug_enabled_flag)
            .init();
    }
}

//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// infraprov - provision workspace runtimes onto container infrastructure
#[derive(Parser)]
#[command(name = "infraprov")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision workspace runtimes onto container infrastructure")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format; logs go to stderr as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH", env = "INFRAPROV_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured pipeline over a workspace environment
    #[command(alias = "p")]
    Provision {
        /// Workspace environment (JSON)
        #[arg(long, value_name = "FILE")]
        environment: PathBuf,

        /// Infrastructure objects to start from (JSON); derived from the
        /// environment's machines when omitted
        #[arg(long, value_name = "FILE")]
        seed: Option<PathBuf>,

        /// Workspace the runtime belongs to
        #[arg(long)]
        workspace_id: String,

        /// User starting the runtime
        #[arg(long)]
        owner: String,

        /// Name of the workspace environment
        #[arg(long, default_value = "default")]
        env_name: String,
    },

    /// Show the configured stage order
    Stages,
}

//! Slipway — configure and deploy Django projects to Scalingo.
//!
//! # Usage
//!
//! ```text
//! slipway deploy [--path <dir>] [--automate-all] [--deployed-project-name <name>]
//! ```
//!
//! Without `--automate-all`, slipway only prepares the project (runtime pin,
//! Procfile, post-deploy hook, requirements, settings patch) and prints the
//! manual next steps. With it, slipway also creates the Scalingo app and
//! Postgres addon, commits, pushes, and opens the deployed app.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::deploy::DeployArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "slipway",
    version,
    about = "Configure a Django project for deployment to Scalingo",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configure the project for Scalingo; optionally provision and push.
    Deploy(DeployArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Deploy(args) => args.run(),
    }
}

//! `slipway deploy` — run the deployment orchestrator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use slipway_core::{AppName, DeploymentContext, RunMode};
use slipway_deploy::{DeployOutcome, Orchestrator, WriteResult};
use slipway_platform::SystemRunner;

/// Arguments for `slipway deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Path to the project root.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Also provision the Scalingo app and database, commit, push, and open
    /// the deployed app.
    #[arg(long)]
    pub automate_all: bool,

    /// Explicit Scalingo app name (default: derived from the local project
    /// name, suffixed when too short for the platform).
    #[arg(long, value_name = "NAME")]
    pub deployed_project_name: Option<String>,
}

impl DeployArgs {
    pub fn run(self) -> Result<()> {
        let root = self
            .path
            .canonicalize()
            .with_context(|| format!("cannot resolve path '{}'", self.path.display()))?;

        let mode = RunMode::from_automate_flag(self.automate_all);
        let mut ctx = DeploymentContext::discover(
            &root,
            mode,
            self.deployed_project_name.map(AppName::from),
        )
        .with_context(|| format!("not a deployable project at '{}'", root.display()))?;

        println!(
            "Configuring '{}' for deployment to Scalingo ({mode})...",
            ctx.local_project_name()
        );

        let runner = SystemRunner;
        let mut orchestrator = Orchestrator::new(&runner);
        // DeployError already names the failing phase and step.
        let outcome = orchestrator
            .run(&mut ctx)
            .context("deployment run aborted")?;

        print_outcome(&outcome);
        Ok(())
    }
}

fn print_outcome(outcome: &DeployOutcome) {
    for (step, write) in &outcome.writes {
        match write {
            WriteResult::Written { path } => {
                println!("  {} {step}: {}", "✎".green(), path.display())
            }
            WriteResult::Unchanged { path } => {
                println!("  {} {step}: {}", "·".dimmed(), path.display())
            }
        }
    }
    println!();
    println!("{}", "✓ Success".green().bold());
    println!();
    println!("{}", outcome.report);
}

//! Remote resource provisioning via the Scalingo CLI.
//!
//! Only invoked in automate-all mode. Order matters: the app name is
//! established first (so the settings patch can read it later), then the app
//! is created, then the Postgres addon is attached, then we block on a
//! bounded readiness poll.

use std::time::Duration;

use slipway_core::{AppName, DeploymentContext};

use crate::error::ProvisionError;
use crate::poll::{poll_until_ready, PollOutcome, Readiness};
use crate::runner::CommandRunner;

/// The platform CLI binary.
pub const SCALINGO_BIN: &str = "scalingo";

/// Managed database addon and plan attached to every provisioned app.
pub const PG_ADDON: &str = "postgresql";
pub const PG_PLAN: &str = "postgresql-starter-512";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(180);

/// A successfully provisioned remote app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedApp {
    pub app_name: AppName,
}

/// Creates the remote app and database through a [`CommandRunner`].
pub struct Provisioner<'r, R: CommandRunner> {
    runner: &'r R,
    poll_interval: Duration,
    max_wait: Duration,
}

impl<'r, R: CommandRunner> Provisioner<'r, R> {
    pub fn new(runner: &'r R) -> Self {
        Provisioner {
            runner,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Override the readiness-poll bounds (tests use millisecond windows).
    pub fn with_poll_bounds(mut self, interval: Duration, max_wait: Duration) -> Self {
        self.poll_interval = interval;
        self.max_wait = max_wait;
        self
    }

    /// Create the app, attach Postgres, and wait for the database.
    ///
    /// Mutates the context once: `deployed_project_name` is established if
    /// unset. All other effects are remote.
    pub fn provision(
        &self,
        ctx: &mut DeploymentContext,
    ) -> Result<ProvisionedApp, ProvisionError> {
        let app_name = ctx.ensure_deployed_name();
        let root = ctx.project_root().to_path_buf();

        log::info!("creating Scalingo app '{app_name}'");
        let output = self
            .runner
            .run_checked(&root, SCALINGO_BIN, &["create", &app_name.0])?;
        if output.combined().to_lowercase().contains("already exist") {
            return Err(ProvisionError::AppAlreadyExists { name: app_name });
        }
        log::info!("{}", output.stdout.trim_end());

        log::info!("attaching Postgres addon to '{app_name}'");
        let output = self.runner.run_checked(
            &root,
            SCALINGO_BIN,
            &["--app", &app_name.0, "addons-add", PG_ADDON, PG_PLAN],
        )?;
        log::info!("{}", output.stdout.trim_end());

        log::info!("waiting for database to become ready");
        let outcome = poll_until_ready(
            || self.database_ready(&app_name, &root),
            self.poll_interval,
            self.max_wait,
        )?;
        match outcome {
            PollOutcome::Ready => Ok(ProvisionedApp { app_name }),
            PollOutcome::TimedOut { waited } => Err(ProvisionError::Timeout {
                app: app_name,
                waited,
            }),
        }
    }

    /// One readiness observation: query addon status and look for a running
    /// Postgres entry. Read-only, so an interrupted poll resumes safely.
    fn database_ready(
        &self,
        app_name: &AppName,
        root: &std::path::Path,
    ) -> Result<Readiness, ProvisionError> {
        let output =
            self.runner
                .run_checked(root, SCALINGO_BIN, &["--app", &app_name.0, "addons"])?;
        let status = output.stdout.to_lowercase();
        if status.contains(PG_ADDON) && status.contains("running") {
            Ok(Readiness::Ready)
        } else {
            log::debug!("database not ready yet for '{app_name}'");
            Ok(Readiness::NotReady)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

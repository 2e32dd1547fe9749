//! The deployment orchestrator.
//!
//! Sequences the whole run as a state machine:
//!
//! ```text
//! Idle → Validating → (Provisioning) → Mutating → (Finalizing) → Reporting → Done
//!                \            \             \
//!                 `-----------`-------------`→ Failed
//! ```
//!
//! `Provisioning` and `Finalizing` are skipped entirely when automation is
//! disabled. Failure in any state moves directly to `Failed` and performs no
//! further steps — this is a configure-then-hand-off tool, not a
//! transactional system; mutation steps are idempotent, so re-running after
//! a failure is safe.

use std::fmt;
use std::io::Write as _;
use std::time::Duration;

use chrono::Utc;

use slipway_core::DeploymentContext;
use slipway_platform::{finalize, CommandRunner, Provisioner};
use slipway_renderer::Renderer;

use crate::error::{DeployError, StepName};
use crate::report::SuccessReport;
use crate::steps;
use crate::validate::validate;
use crate::writer::WriteResult;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(180);

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Current state of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Provisioning,
    Mutating,
    Finalizing,
    Reporting,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Provisioning => "provisioning",
            Phase::Mutating => "mutating",
            Phase::Finalizing => "finalizing",
            Phase::Reporting => "reporting",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Outcome of a successful run.
#[derive(Debug)]
pub struct DeployOutcome {
    pub report: SuccessReport,
    /// Per-step write results, in execution order.
    pub writes: Vec<(StepName, WriteResult)>,
}

/// Owns the run sequence and the only mutation of the context.
pub struct Orchestrator<'r, R: CommandRunner> {
    runner: &'r R,
    phase: Phase,
    poll_interval: Duration,
    max_wait: Duration,
}

impl<'r, R: CommandRunner> Orchestrator<'r, R> {
    pub fn new(runner: &'r R) -> Self {
        Orchestrator {
            runner,
            phase: Phase::Idle,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Override the provisioner's readiness-poll bounds.
    pub fn with_poll_bounds(mut self, interval: Duration, max_wait: Duration) -> Self {
        self.poll_interval = interval;
        self.max_wait = max_wait;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the full sequence: validate → provision (automated only) → mutate
    /// → finalize (automated only) → report.
    pub fn run(&mut self, ctx: &mut DeploymentContext) -> Result<DeployOutcome, DeployError> {
        let runner = self.runner;

        self.phase = Phase::Validating;
        validate(ctx, runner).map_err(|e| self.fail(e))?;

        if ctx.mode().is_automated() {
            self.phase = Phase::Provisioning;
            let provisioner =
                Provisioner::new(runner).with_poll_bounds(self.poll_interval, self.max_wait);
            let app = provisioner.provision(ctx).map_err(|e| self.fail(e))?;
            tracing::info!("provisioned app '{}'", app.app_name);
        }

        self.phase = Phase::Mutating;
        let renderer = Renderer::new().map_err(|e| self.fail(e))?;
        let writes = steps::run_all(ctx, &renderer).map_err(|e| self.fail(e))?;
        write_run_log(ctx, &writes);

        let report = if ctx.mode().is_automated() {
            self.phase = Phase::Finalizing;
            let outcome = finalize(runner, ctx).map_err(|e| self.fail(e))?;
            SuccessReport::Automated {
                deployed_url: outcome.deployed_url,
                open_warning: outcome.open_warning,
            }
        } else {
            SuccessReport::Manual {
                log_dir: ctx.log_dir(),
            }
        };

        self.phase = Phase::Reporting;
        // Success reporting cannot fail; Reporting always reaches Done.
        self.phase = Phase::Done;
        Ok(DeployOutcome { report, writes })
    }

    fn fail<E: Into<DeployError>>(&mut self, err: E) -> DeployError {
        self.phase = Phase::Failed;
        err.into()
    }
}

/// Append a one-line summary of this run to `<root>/slipway_logs/deploy.log`.
/// Best-effort: a logging failure must not fail an otherwise good run.
fn write_run_log(ctx: &DeploymentContext, writes: &[(StepName, WriteResult)]) {
    let log_dir = ctx.log_dir();
    let result = std::fs::create_dir_all(&log_dir).and_then(|_| {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("deploy.log"))?;
        let written = writes
            .iter()
            .filter(|(_, w)| matches!(w, WriteResult::Written { .. }))
            .count();
        writeln!(
            file,
            "{} configured '{}' for Scalingo ({} mode, {written} of {} files written)",
            Utc::now().to_rfc3339(),
            ctx.local_project_name(),
            ctx.mode(),
            writes.len(),
        )
    });
    if let Err(e) = result {
        tracing::warn!("could not write run log in {}: {e}", log_dir.display());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

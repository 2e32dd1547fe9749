//! # slipway-deploy
//!
//! Deployment orchestration: preflight validation, the idempotent project
//! mutation steps, and the state machine that sequences validation →
//! provisioning → mutation → finalize → reporting.
//!
//! Call [`Orchestrator::run`] with a [`slipway_core::DeploymentContext`] to
//! execute a full run.

pub mod error;
pub mod orchestrator;
pub mod report;
pub mod steps;
pub mod validate;
pub mod writer;

pub use error::{DeployError, MutateError, StepName, ValidationError};
pub use orchestrator::{DeployOutcome, Orchestrator, Phase};
pub use report::SuccessReport;
pub use validate::validate;
pub use writer::WriteResult;

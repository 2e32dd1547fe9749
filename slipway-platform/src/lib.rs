//! # slipway-platform
//!
//! Scalingo CLI collaborators: command execution with captured output, the
//! bounded database readiness poll, remote resource provisioning, and the
//! commit / push / open finalize flow.
//!
//! All platform interaction is synchronous and fully consumed — output
//! captured, exit status checked — before the next step proceeds.

pub mod error;
pub mod finalize;
pub mod poll;
pub mod provision;
pub mod runner;
pub mod testing;

pub use error::{CliError, FinalizeError, ProvisionError};
pub use finalize::{finalize, FinalizeOutcome, COMMIT_MESSAGE};
pub use poll::{poll_until_ready, PollOutcome, Readiness};
pub use provision::{ProvisionedApp, Provisioner, SCALINGO_BIN};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

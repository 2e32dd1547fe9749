//! Slipway core library — deployment context, app naming, errors.
//!
//! Public API surface:
//! - [`types`] — [`AppName`] and [`RunMode`]
//! - [`context`] — [`DeploymentContext`] and project discovery
//! - [`error`] — [`ContextError`]

pub mod context;
pub mod error;
pub mod types;

pub use context::DeploymentContext;
pub use error::ContextError;
pub use types::{AppName, RunMode};

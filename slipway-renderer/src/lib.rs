//! # slipway-renderer
//!
//! Tera-based template engine that renders platform-specific file fragments
//! from deployment context data.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use slipway_core::{DeploymentContext, RunMode};
//! use slipway_renderer::{Renderer, SettingsContext};
//!
//! fn patch(ctx: &DeploymentContext, current: &str) -> Option<String> {
//!     let renderer = Renderer::new().ok()?;
//!     let sc = SettingsContext::from_deployment(ctx, current);
//!     renderer.render_settings(&sc).ok()
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::SettingsContext;
pub use engine::Renderer;
pub use error::RenderError;

//! Template context — serializable rendering payload for the settings patch.

use serde::{Deserialize, Serialize};

use slipway_core::DeploymentContext;

use crate::error::RenderError;

/// Rendering payload for the Scalingo settings fragment.
///
/// The three keys the templates may reference: the project's current
/// settings content, the deployed app name, and the local project name.
/// Templates must not depend on anything else about the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsContext {
    /// Full current content of the project's settings.py; rendered above the
    /// inserted platform block so the original settings remain intact.
    pub current_settings: String,
    /// The Scalingo app name (provisioned, explicit, or derived fallback).
    pub deployed_project_name: String,
    /// Name of the local Django project package.
    pub local_project_name: String,
}

impl SettingsContext {
    /// Build a [`SettingsContext`] from the deployment context plus the
    /// current settings file content.
    ///
    /// Uses [`DeploymentContext::deployed_name_or_default`], so a
    /// configure-only run (no provisioning) renders with the derived local
    /// fallback name.
    pub fn from_deployment(ctx: &DeploymentContext, current_settings: &str) -> Self {
        SettingsContext {
            current_settings: current_settings.trim_end().to_string(),
            deployed_project_name: ctx.deployed_name_or_default().0,
            local_project_name: ctx.local_project_name().to_string(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipway_core::RunMode;

    #[test]
    fn context_uses_fallback_name_without_provisioning() {
        let ctx = DeploymentContext::new("blog", "/tmp/blog", RunMode::Configure);
        let sc = SettingsContext::from_deployment(&ctx, "DEBUG = True\n");
        assert_eq!(sc.deployed_project_name, "blog-deployed");
        assert_eq!(sc.local_project_name, "blog");
        assert_eq!(sc.current_settings, "DEBUG = True");
    }

    #[test]
    fn context_uses_provisioned_name_when_set() {
        let mut ctx = DeploymentContext::new("blog", "/tmp/blog", RunMode::AutomateAll);
        ctx.ensure_deployed_name();
        let sc = SettingsContext::from_deployment(&ctx, "");
        assert_eq!(sc.deployed_project_name, "blog-deployed");
    }

    #[test]
    fn to_tera_context_succeeds() {
        let ctx = DeploymentContext::new("blog", "/tmp/blog", RunMode::Configure);
        let sc = SettingsContext::from_deployment(&ctx, "X = 1\n");
        sc.to_tera_context().expect("context conversion");
    }
}

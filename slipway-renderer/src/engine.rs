//! Tera rendering engine for platform file fragments.
//!
//! Templates are embedded in the binary at compile time via `include_str!`.
//! The engine exposes one operation per platform fragment; callers supply a
//! [`SettingsContext`] and get rendered text back — file placement is the
//! mutation layer's concern.

use tera::Tera;

use crate::context::SettingsContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates
// ---------------------------------------------------------------------------

/// Name of the Scalingo settings-fragment template.
pub const SETTINGS_TEMPLATE: &str = "scalingo/settings.py.tera";

const TPLS: &[(&str, &str)] = &[(
    SETTINGS_TEMPLATE,
    include_str!("templates/settings.py.tera"),
)];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    let items: Vec<(String, String)> = TPLS
        .iter()
        .map(|(name, content)| ((*name).to_string(), (*content).to_string()))
        .collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for platform fragments.
///
/// Uses embedded templates only. Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera()? })
    }

    /// Render the Scalingo settings fragment: the current settings content
    /// followed by the platform block, normalised to LF line endings.
    pub fn render_settings(&self, ctx: &SettingsContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(SETTINGS_TEMPLATE, &tera_ctx)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use slipway_core::{DeploymentContext, RunMode};

    fn render_for(local_name: &str, settings: &str) -> String {
        let ctx = DeploymentContext::new(local_name, "/tmp/x", RunMode::Configure);
        let sc = SettingsContext::from_deployment(&ctx, settings);
        Renderer::new().unwrap().render_settings(&sc).unwrap()
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn original_settings_precede_platform_block() {
        let out = render_for("blog", "DEBUG = True\nSECRET_KEY = \"x\"\n");
        let original_pos = out.find("SECRET_KEY").expect("original settings present");
        let block_pos = out.find("Scalingo settings").expect("platform block present");
        assert!(
            original_pos < block_pos,
            "original settings must remain above the inserted block"
        );
    }

    #[test]
    fn block_is_guarded_by_stack_check() {
        let out = render_for("blog", "DEBUG = True\n");
        assert!(out.contains(r#"if "scalingo" in os.environ.get("STACK", ""):"#));
    }

    #[test]
    fn deployed_name_appears_in_trusted_origins() {
        let out = render_for("blog", "");
        assert!(
            out.contains("https://blog-deployed.osc-fr1.scalingo.io"),
            "derived fallback name should parameterize CSRF_TRUSTED_ORIGINS:\n{out}"
        );
    }

    #[test]
    fn database_config_reads_env_connection_string() {
        let out = render_for("myblogapp", "");
        assert!(out.contains(r#"env="DATABASE_URL""#));
        assert!(out.contains("dj_database_url"));
    }

    #[test]
    fn allowed_hosts_are_relaxed() {
        let out = render_for("myblogapp", "");
        assert!(out.contains(r#"ALLOWED_HOSTS = ["*"]"#));
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let out = render_for("blog", "A = 1\r\nB = 2\r\n");
        assert!(!out.contains('\r'), "line endings must be normalised to LF");
    }
}

//! Project mutation steps.
//!
//! Each step is idempotent and independently runnable: it assumes nothing
//! about which other steps ran in this process, derives everything it needs
//! from the [`DeploymentContext`], and either writes deterministic content or
//! detects that its work is already done. The orchestrator always runs all
//! of them, in the order of [`run_all`].

use std::path::Path;

use slipway_core::DeploymentContext;
use slipway_renderer::{Renderer, SettingsContext};

use crate::error::{step_io_err, MutateCause, MutateError, StepName};
use crate::writer::{atomic_write, WriteResult};

/// Fixed Python runtime pin written to `.python-version`.
pub const PYTHON_VERSION: &str = "3.14";

/// Marker line identifying an already-patched settings file. Must match the
/// comment emitted by the settings template.
pub const SETTINGS_MARKER: &str = "# Scalingo settings (slipway).";

/// Packages Scalingo deployment requires in the dependency manifest.
pub const REQUIRED_PACKAGES: &[&str] = &[
    "gunicorn",
    "psycopg2",
    "dj-database-url",
    "whitenoise",
    "dj-static",
];

// ---------------------------------------------------------------------------
// Runtime pin
// ---------------------------------------------------------------------------

/// Write the `.python-version` marker file at the project root.
pub fn write_runtime_pin(ctx: &DeploymentContext) -> Result<WriteResult, MutateError> {
    let path = ctx.project_root().join(".python-version");
    atomic_write(&path, &format!("{PYTHON_VERSION}\n"))
        .map_err(|e| step_io_err(StepName::RuntimePin, &path, e))
}

// ---------------------------------------------------------------------------
// Procfile
// ---------------------------------------------------------------------------

/// Accumulates process declarations into one buffer with a single flush
/// point, so multiple contributions can never produce partial or duplicated
/// file content.
#[derive(Debug, Default)]
pub struct ProcfileBuilder {
    lines: Vec<String>,
}

impl ProcfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the web process: gunicorn pointed at the project's WSGI module.
    pub fn web(mut self, project_name: &str) -> Self {
        self.lines
            .push(format!("web: gunicorn {project_name}.wsgi --log-file -"));
        self
    }

    /// Declare the post-deploy process that runs the hook script.
    pub fn postdeploy(mut self) -> Self {
        self.lines
            .push("postdeploy: bash bin/post_deploy.sh".to_string());
        self
    }

    /// Render the accumulated declarations as final file content.
    pub fn build(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Write the `Procfile` declaring the web and post-deploy processes.
pub fn write_procfile(ctx: &DeploymentContext) -> Result<WriteResult, MutateError> {
    let path = ctx.project_root().join("Procfile");
    let contents = ProcfileBuilder::new()
        .web(ctx.local_project_name())
        .postdeploy()
        .build();
    atomic_write(&path, &contents).map_err(|e| step_io_err(StepName::Procfile, &path, e))
}

// ---------------------------------------------------------------------------
// Post-deploy hook
// ---------------------------------------------------------------------------

const POST_DEPLOY_SCRIPT: &str = "#!/bin/sh\n\npython manage.py migrate\n";

/// Create `bin/post_deploy.sh`, executable, running the schema migration.
pub fn write_post_deploy_hook(ctx: &DeploymentContext) -> Result<WriteResult, MutateError> {
    let path = ctx.project_root().join("bin").join("post_deploy.sh");
    let result = atomic_write(&path, POST_DEPLOY_SCRIPT)
        .map_err(|e| step_io_err(StepName::PostDeployHook, &path, e))?;
    set_executable(&path).map_err(|e| step_io_err(StepName::PostDeployHook, &path, e))?;
    Ok(result)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), std::io::Error> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), std::io::Error> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// Append the platform-required packages to `requirements.txt`, leaving
/// existing entries untouched and never duplicating one that is already
/// present under any pip-equivalent spelling.
pub fn add_requirements(ctx: &DeploymentContext) -> Result<WriteResult, MutateError> {
    let path = ctx.project_root().join("requirements.txt");
    let current = std::fs::read_to_string(&path)
        .map_err(|e| step_io_err(StepName::Requirements, &path, e))?;

    let existing: Vec<String> = current
        .lines()
        .filter_map(requirement_name)
        .map(|n| normalize_package_name(&n))
        .collect();

    let missing: Vec<&str> = REQUIRED_PACKAGES
        .iter()
        .copied()
        .filter(|pkg| !existing.contains(&normalize_package_name(pkg)))
        .collect();

    if missing.is_empty() {
        return Ok(WriteResult::Unchanged { path });
    }

    let mut contents = current;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for pkg in missing {
        contents.push_str(pkg);
        contents.push('\n');
    }

    atomic_write(&path, &contents).map_err(|e| step_io_err(StepName::Requirements, &path, e))
}

/// Package name portion of a requirement line, ignoring comments and blanks.
fn requirement_name(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let name: String = trimmed
        .chars()
        .take_while(|c| !matches!(c, '=' | '<' | '>' | '!' | '~' | ';' | '[' | ' ' | '#'))
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// pip treats `-`, `_`, and `.` as equivalent and names as case-insensitive.
fn normalize_package_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '.'], "-")
}

// ---------------------------------------------------------------------------
// Settings patch
// ---------------------------------------------------------------------------

/// Render the Scalingo settings fragment and merge it into the project's
/// settings file, original settings intact above the inserted block.
///
/// Reads the deployed name through
/// [`DeploymentContext::deployed_name_or_default`]: the provisioned name when
/// automation established one, the derived local fallback otherwise. The
/// rendered block carries [`SETTINGS_MARKER`], so a second run detects it and
/// leaves the file alone.
pub fn patch_settings(
    ctx: &DeploymentContext,
    renderer: &Renderer,
) -> Result<WriteResult, MutateError> {
    let path = ctx.settings_path();
    let current = std::fs::read_to_string(&path)
        .map_err(|e| step_io_err(StepName::SettingsPatch, &path, e))?;

    if current.contains(SETTINGS_MARKER) {
        return Ok(WriteResult::Unchanged { path });
    }

    let settings_ctx = SettingsContext::from_deployment(ctx, &current);
    let rendered = renderer
        .render_settings(&settings_ctx)
        .map_err(|e| MutateError {
            step: StepName::SettingsPatch,
            path: path.clone(),
            source: MutateCause::Render(e),
        })?;

    atomic_write(&path, &rendered).map_err(|e| step_io_err(StepName::SettingsPatch, &path, e))
}

// ---------------------------------------------------------------------------
// run_all
// ---------------------------------------------------------------------------

/// Run every mutation step in order, reporting each outcome.
pub fn run_all(
    ctx: &DeploymentContext,
    renderer: &Renderer,
) -> Result<Vec<(StepName, WriteResult)>, MutateError> {
    let results = vec![
        (StepName::RuntimePin, write_runtime_pin(ctx)?),
        (StepName::Procfile, write_procfile(ctx)?),
        (StepName::PostDeployHook, write_post_deploy_hook(ctx)?),
        (StepName::Requirements, add_requirements(ctx)?),
        (StepName::SettingsPatch, patch_settings(ctx, renderer)?),
    ];
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use slipway_core::RunMode;
    use std::fs;
    use tempfile::TempDir;

    fn fake_project(name: &str) -> (TempDir, DeploymentContext) {
        let root = TempDir::new().expect("tempdir");
        let pkg = root.path().join(name);
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("settings.py"),
            "DEBUG = True\nMIDDLEWARE = []\n",
        )
        .unwrap();
        fs::write(root.path().join("manage.py"), "#!/usr/bin/env python\n").unwrap();
        fs::write(root.path().join("requirements.txt"), "django>=5.0\n").unwrap();
        let ctx =
            DeploymentContext::discover(root.path(), RunMode::Configure, None).expect("discover");
        (root, ctx)
    }

    #[test]
    fn runtime_pin_writes_fixed_version() {
        let (root, ctx) = fake_project("blog");
        write_runtime_pin(&ctx).unwrap();
        let content = fs::read_to_string(root.path().join(".python-version")).unwrap();
        assert_eq!(content, "3.14\n");
    }

    #[test]
    fn procfile_has_one_web_then_one_postdeploy_line() {
        let (root, ctx) = fake_project("blog");
        write_procfile(&ctx).unwrap();
        let content = fs::read_to_string(root.path().join("Procfile")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "web: gunicorn blog.wsgi --log-file -",
                "postdeploy: bash bin/post_deploy.sh",
            ]
        );
        assert_eq!(
            content.matches("web:").count(),
            1,
            "exactly one web declaration"
        );
        assert_eq!(content.matches("postdeploy:").count(), 1);
    }

    #[test]
    fn procfile_builder_accumulates_in_call_order() {
        let content = ProcfileBuilder::new().web("myblogapp").postdeploy().build();
        let web_pos = content.find("web:").unwrap();
        let post_pos = content.find("postdeploy:").unwrap();
        assert!(web_pos < post_pos);
        assert!(content.ends_with('\n'), "single flush ends with newline");
    }

    #[test]
    #[cfg(unix)]
    fn post_deploy_hook_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let (root, ctx) = fake_project("blog");
        write_post_deploy_hook(&ctx).unwrap();
        let path = root.path().join("bin").join("post_deploy.sh");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("python manage.py migrate"));
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn requirements_appends_missing_without_touching_existing() {
        let (root, ctx) = fake_project("blog");
        add_requirements(&ctx).unwrap();
        let content = fs::read_to_string(root.path().join("requirements.txt")).unwrap();
        assert!(content.starts_with("django>=5.0\n"), "existing entry intact");
        for pkg in REQUIRED_PACKAGES {
            assert!(content.contains(pkg), "missing package {pkg}");
        }
    }

    #[test]
    fn requirements_does_not_duplicate_equivalent_spellings() {
        let (root, ctx) = fake_project("blog");
        fs::write(
            root.path().join("requirements.txt"),
            "Django>=5.0\ngunicorn==21.2\nDJ_DATABASE_URL\n",
        )
        .unwrap();
        add_requirements(&ctx).unwrap();
        let content = fs::read_to_string(root.path().join("requirements.txt")).unwrap();
        assert_eq!(content.matches("gunicorn").count(), 1);
        assert_eq!(content.to_lowercase().matches("dj-database-url").count()
            + content.to_lowercase().matches("dj_database_url").count(), 1);
        assert!(content.contains("whitenoise"));
    }

    #[test]
    fn requirements_second_run_is_unchanged() {
        let (root, ctx) = fake_project("blog");
        add_requirements(&ctx).unwrap();
        let first = fs::read_to_string(root.path().join("requirements.txt")).unwrap();
        let result = add_requirements(&ctx).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
        let second = fs::read_to_string(root.path().join("requirements.txt")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn settings_patch_preserves_original_above_block() {
        let (_root, ctx) = fake_project("blog");
        let renderer = Renderer::new().unwrap();
        patch_settings(&ctx, &renderer).unwrap();
        let content = fs::read_to_string(ctx.settings_path()).unwrap();
        let original_pos = content.find("DEBUG = True").unwrap();
        let block_pos = content.find(SETTINGS_MARKER).unwrap();
        assert!(original_pos < block_pos);
        assert!(content.contains("blog-deployed"), "fallback name rendered");
    }

    #[test]
    fn settings_patch_is_marker_guarded() {
        let (_root, ctx) = fake_project("blog");
        let renderer = Renderer::new().unwrap();
        patch_settings(&ctx, &renderer).unwrap();
        let first = fs::read_to_string(ctx.settings_path()).unwrap();
        let result = patch_settings(&ctx, &renderer).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
        let second = fs::read_to_string(ctx.settings_path()).unwrap();
        assert_eq!(first, second, "patching twice must not duplicate the block");
    }

    #[test]
    fn every_step_twice_equals_once() {
        let (root, ctx) = fake_project("blog");
        let renderer = Renderer::new().unwrap();
        run_all(&ctx, &renderer).unwrap();
        let snapshot = |name: &str| fs::read_to_string(root.path().join(name)).unwrap();
        let before = (
            snapshot(".python-version"),
            snapshot("Procfile"),
            snapshot("bin/post_deploy.sh"),
            snapshot("requirements.txt"),
            fs::read_to_string(ctx.settings_path()).unwrap(),
        );
        run_all(&ctx, &renderer).unwrap();
        let after = (
            snapshot(".python-version"),
            snapshot("Procfile"),
            snapshot("bin/post_deploy.sh"),
            snapshot("requirements.txt"),
            fs::read_to_string(ctx.settings_path()).unwrap(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn requirement_name_parsing() {
        assert_eq!(requirement_name("django>=5.0"), Some("django".to_string()));
        assert_eq!(requirement_name("  # comment"), None);
        assert_eq!(requirement_name(""), None);
        assert_eq!(
            requirement_name("psycopg2==2.9 ; python_version > '3'"),
            Some("psycopg2".to_string())
        );
    }
}

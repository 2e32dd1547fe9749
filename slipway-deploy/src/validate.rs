//! Preflight validation.
//!
//! Confirms the local project and environment are compatible with Scalingo
//! before any mutation occurs. No side effects; any failure aborts the whole
//! run with nothing modified.
//!
//! Checks, in order:
//! 1. `manage.py` at the project root
//! 2. the Django settings module is present and readable
//! 3. `requirements.txt` at the project root (the dependency manifest the
//!    requirements step appends to)
//! 4. `.git/` at the project root (Scalingo deploys via git push)
//! 5. the `scalingo` CLI resolves — automate-all runs only; configuring a
//!    project must work on machines without the platform CLI

use slipway_core::DeploymentContext;
use slipway_platform::{CommandRunner, SCALINGO_BIN};

use crate::error::ValidationError;

pub fn validate<R: CommandRunner>(
    ctx: &DeploymentContext,
    runner: &R,
) -> Result<(), ValidationError> {
    let root = ctx.project_root();

    let manage = root.join("manage.py");
    if !manage.is_file() {
        return Err(ValidationError::Missing {
            what: "manage.py",
            path: manage,
        });
    }

    let settings = ctx.settings_path();
    if !settings.is_file() {
        return Err(ValidationError::Missing {
            what: "Django settings module",
            path: settings,
        });
    }
    std::fs::read_to_string(&settings).map_err(|e| ValidationError::Io {
        path: settings,
        source: e,
    })?;

    let requirements = root.join("requirements.txt");
    if !requirements.is_file() {
        return Err(ValidationError::Missing {
            what: "requirements.txt",
            path: requirements,
        });
    }

    if !root.join(".git").is_dir() {
        return Err(ValidationError::NotARepository {
            path: root.to_path_buf(),
        });
    }

    if ctx.mode().is_automated() {
        runner
            .run_checked(root, SCALINGO_BIN, &["version"])
            .map_err(|e| ValidationError::ToolMissing {
                tool: SCALINGO_BIN.to_string(),
                source: e,
            })?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use slipway_core::RunMode;
    use slipway_platform::testing::ScriptedRunner;
    use slipway_platform::CommandOutput;
    use std::fs;
    use tempfile::TempDir;

    fn valid_project(name: &str) -> TempDir {
        let root = TempDir::new().expect("tempdir");
        let pkg = root.path().join(name);
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("settings.py"), "DEBUG = True\n").unwrap();
        fs::write(root.path().join("manage.py"), "#!/usr/bin/env python\n").unwrap();
        fs::write(root.path().join("requirements.txt"), "django\n").unwrap();
        fs::create_dir_all(root.path().join(".git")).unwrap();
        root
    }

    fn ctx_at(root: &TempDir, mode: RunMode) -> DeploymentContext {
        DeploymentContext::discover(root.path(), mode, None).expect("discover")
    }

    #[test]
    fn valid_project_passes() {
        let root = valid_project("blog");
        let ctx = ctx_at(&root, RunMode::Configure);
        validate(&ctx, &ScriptedRunner::new()).expect("validation should pass");
    }

    #[test]
    fn missing_manage_py_fails() {
        let root = valid_project("blog");
        fs::remove_file(root.path().join("manage.py")).unwrap();
        let ctx = ctx_at(&root, RunMode::Configure);
        let err = validate(&ctx, &ScriptedRunner::new()).unwrap_err();
        assert!(matches!(err, ValidationError::Missing { what: "manage.py", .. }));
    }

    #[test]
    fn missing_requirements_fails() {
        let root = valid_project("blog");
        fs::remove_file(root.path().join("requirements.txt")).unwrap();
        let ctx = ctx_at(&root, RunMode::Configure);
        let err = validate(&ctx, &ScriptedRunner::new()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Missing { what: "requirements.txt", .. }
        ));
    }

    #[test]
    fn missing_git_dir_fails() {
        let root = valid_project("blog");
        fs::remove_dir_all(root.path().join(".git")).unwrap();
        let ctx = ctx_at(&root, RunMode::Configure);
        let err = validate(&ctx, &ScriptedRunner::new()).unwrap_err();
        assert!(matches!(err, ValidationError::NotARepository { .. }));
    }

    #[test]
    fn configure_mode_does_not_require_platform_cli() {
        let root = valid_project("blog");
        let ctx = ctx_at(&root, RunMode::Configure);
        let runner = ScriptedRunner::new().on("version", CommandOutput::failed(127, "not found"));
        validate(&ctx, &runner).expect("configure mode must not touch the platform CLI");
        assert!(!runner.saw("scalingo"), "no scalingo invocation expected");
    }

    #[test]
    fn automated_mode_requires_platform_cli() {
        let root = valid_project("blog");
        let ctx = ctx_at(&root, RunMode::AutomateAll);
        let runner = ScriptedRunner::new().on("version", CommandOutput::failed(127, "not found"));
        let err = validate(&ctx, &runner).unwrap_err();
        assert!(matches!(err, ValidationError::ToolMissing { .. }));
    }
}

//! The process-wide deployment context.
//!
//! # Mutability contract
//!
//! [`DeploymentContext`] is read-only after construction except for two
//! fields, each set exactly once during a run:
//!
//! - `deployed_project_name` — set by provisioning (or left unset in
//!   configure-only mode, where readers fall back via
//!   [`DeploymentContext::deployed_name_or_default`]).
//! - `deployed_url` — set by finalize after a successful push.
//!
//! Later steps that depend on these values read them through the accessors,
//! never through incidental ordering.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ContextError};
use crate::types::{AppName, RunMode};

/// Directory under the project root where run logs are written.
pub const LOG_DIR_NAME: &str = "slipway_logs";

/// Everything a deployment run needs to know about the local project.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    /// Name of the local Django project (the package containing settings.py).
    local_project_name: String,
    /// Absolute path to the project root.
    project_root: PathBuf,
    /// Configure-only or automate-all.
    mode: RunMode,
    /// Remote app name; `None` until provisioning (or an explicit
    /// `--deployed-project-name`) establishes it.
    deployed_project_name: Option<AppName>,
    /// Deployed URL; `None` until finalize records it.
    deployed_url: Option<String>,
}

impl DeploymentContext {
    /// Build a context by scanning `project_root` for the Django settings
    /// module. The local project name is the name of the package directory
    /// that contains `settings.py`.
    pub fn discover(
        project_root: &Path,
        mode: RunMode,
        deployed_project_name: Option<AppName>,
    ) -> Result<Self, ContextError> {
        if !project_root.is_dir() {
            return Err(ContextError::RootNotFound {
                path: project_root.to_path_buf(),
            });
        }

        let local_project_name = find_settings_package(project_root)?;

        Ok(DeploymentContext {
            local_project_name,
            project_root: project_root.to_path_buf(),
            mode,
            deployed_project_name,
            deployed_url: None,
        })
    }

    /// Construct directly from known values. Used by tests and callers that
    /// have already resolved the project layout.
    pub fn new(
        local_project_name: impl Into<String>,
        project_root: impl Into<PathBuf>,
        mode: RunMode,
    ) -> Self {
        DeploymentContext {
            local_project_name: local_project_name.into(),
            project_root: project_root.into(),
            mode,
            deployed_project_name: None,
            deployed_url: None,
        }
    }

    pub fn local_project_name(&self) -> &str {
        &self.local_project_name
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// `<root>/<project>/settings.py`
    pub fn settings_path(&self) -> PathBuf {
        self.project_root
            .join(&self.local_project_name)
            .join("settings.py")
    }

    /// `<root>/slipway_logs/`
    pub fn log_dir(&self) -> PathBuf {
        self.project_root.join(LOG_DIR_NAME)
    }

    /// The deployed name, if one has been established.
    pub fn deployed_project_name(&self) -> Option<&AppName> {
        self.deployed_project_name.as_ref()
    }

    /// The deployed name, falling back to a name derived from the local
    /// project when provisioning has not run (configure-only mode).
    pub fn deployed_name_or_default(&self) -> AppName {
        self.deployed_project_name
            .clone()
            .unwrap_or_else(|| AppName::derive_from_local(&self.local_project_name))
    }

    /// Establish the deployed name if unset, deriving it from the local
    /// project name. Returns the name in effect. Idempotent: an already-set
    /// name (explicit or from an earlier run) is never replaced.
    pub fn ensure_deployed_name(&mut self) -> AppName {
        if self.deployed_project_name.is_none() {
            self.deployed_project_name =
                Some(AppName::derive_from_local(&self.local_project_name));
        }
        self.deployed_name_or_default()
    }

    pub fn deployed_url(&self) -> Option<&str> {
        self.deployed_url.as_deref()
    }

    /// Record the deployed URL. Called once, by finalize.
    pub fn set_deployed_url(&mut self, url: impl Into<String>) {
        self.deployed_url = Some(url.into());
    }
}

/// Scan the immediate children of `root` for a package directory containing
/// `settings.py` and return its name. Entries are visited in sorted order so
/// discovery is deterministic.
fn find_settings_package(root: &Path) -> Result<String, ContextError> {
    let mut entries: Vec<_> = std::fs::read_dir(root)
        .map_err(|e| io_err(root, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if entry.path().join("settings.py").is_file() {
            return Ok(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Err(ContextError::SettingsNotFound {
        root: root.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

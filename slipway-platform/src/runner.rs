//! External command execution.
//!
//! Every platform interaction goes through the [`CommandRunner`] trait so the
//! provisioner and finalizer can be exercised against a scripted runner in
//! tests. The real implementation, [`SystemRunner`], shells out via
//! `std::process::Command` with captured output.

use std::path::Path;
use std::process::Command;

use crate::error::CliError;

// ---------------------------------------------------------------------------
// CommandOutput
// ---------------------------------------------------------------------------

/// Captured outcome of one external CLI invocation.
///
/// Ephemeral: owned by the invoking component and discarded once its output
/// has been logged and its status checked.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, when the platform reports one.
    pub code: Option<i32>,
}

impl CommandOutput {
    /// A successful invocation with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }

    /// A failed invocation with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
            code: Some(code),
        }
    }

    /// stdout and stderr concatenated, for "did the platform say X" checks.
    pub fn combined(&self) -> String {
        let mut s = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !s.is_empty() {
                s.push('\n');
            }
            s.push_str(&self.stderr);
        }
        s
    }
}

// ---------------------------------------------------------------------------
// CommandRunner
// ---------------------------------------------------------------------------

/// Runs an external command in a working directory and captures its output.
pub trait CommandRunner {
    /// Run `program` with `args` in `dir`. A non-zero exit is NOT an error at
    /// this level; callers inspect [`CommandOutput::success`].
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput, CliError>;

    /// Run and require success, mapping a non-zero exit to
    /// [`CliError::CommandFailed`].
    fn run_checked(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, CliError> {
        let output = self.run(dir, program, args)?;
        if output.success {
            return Ok(output);
        }
        Err(CliError::CommandFailed {
            program: format!("{program} {}", args.join(" ")),
            status: output
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr: output.combined().trim().to_string(),
        })
    }
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput, CliError> {
        log::debug!("running `{program} {}` in {}", args.join(" "), dir.display());
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| CliError::Spawn {
                program: program.to_string(),
                source: e,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn system_runner_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let out = SystemRunner
            .run(dir.path(), "echo", &["hello"])
            .expect("echo should run");
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn system_runner_reports_missing_binary_as_spawn_error() {
        let dir = TempDir::new().unwrap();
        let err = SystemRunner
            .run(dir.path(), "slipway-no-such-binary", &[])
            .unwrap_err();
        assert!(matches!(err, CliError::Spawn { .. }));
    }

    #[test]
    fn run_checked_maps_nonzero_exit_to_command_failed() {
        let dir = TempDir::new().unwrap();
        let err = SystemRunner
            .run_checked(dir.path(), "false", &[])
            .unwrap_err();
        match err {
            CliError::CommandFailed { program, .. } => assert!(program.starts_with("false")),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn combined_joins_streams() {
        let out = CommandOutput {
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            success: false,
            code: Some(1),
        };
        assert_eq!(out.combined(), "out\nerr");
    }
}

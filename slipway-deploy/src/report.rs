//! The final user-facing success message.

use std::fmt;
use std::path::PathBuf;

/// Mode-dependent success report: manual next-steps after configuration, or
/// the deployment summary after an automated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessReport {
    /// Configure-only: the user commits, pushes, and migrates themselves.
    Manual { log_dir: PathBuf },
    /// Automate-all: everything was pushed; the app is live at the URL.
    Automated {
        deployed_url: String,
        /// Non-fatal warning from the open step, when the push succeeded but
        /// the app could not be opened.
        open_warning: Option<String>,
    },
}

impl fmt::Display for SuccessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessReport::Manual { log_dir } => write!(
                f,
                "Your project is configured for deployment to Scalingo.\n\
                 \n\
                 To deploy:\n\
                 - review the changes slipway made, then commit them:\n\
                 \x20   git add -A && git commit -m \"Configure for Scalingo\"\n\
                 - push to the Scalingo remote:\n\
                 \x20   git push scalingo main\n\
                 \n\
                 Migrations run automatically after each deploy via\n\
                 bin/post_deploy.sh. A log of this run is in {}.",
                log_dir.display()
            ),
            SuccessReport::Automated {
                deployed_url,
                open_warning,
            } => {
                write!(
                    f,
                    "Your project is deployed to Scalingo.\n\
                     \n\
                     Live at: {deployed_url}\n\
                     \n\
                     For future changes: commit, then `git push scalingo main`."
                )?;
                if let Some(warning) = open_warning {
                    write!(f, "\n\nwarning: {warning}")?;
                }
                Ok(())
            }
        }
    }
}

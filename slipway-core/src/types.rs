//! Domain types for slipway.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Scalingo rejects app names of 6 characters or fewer; names at or below
/// this length get [`APP_NAME_SUFFIX`] appended during derivation.
pub const MIN_APP_NAME_LEN: usize = 6;

/// Disambiguating suffix appended to short local project names.
pub const APP_NAME_SUFFIX: &str = "-deployed";

/// A strongly-typed Scalingo app name.
///
/// Construct with [`AppName::derive_from_local`] to get a name that satisfies
/// the platform's minimum length, or convert an explicit user-supplied name
/// with `From`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppName(pub String);

impl AppName {
    /// Derive a platform-valid app name from the local project name.
    ///
    /// Names of length ≤ [`MIN_APP_NAME_LEN`] get [`APP_NAME_SUFFIX`]
    /// appended; longer names are used unchanged.
    pub fn derive_from_local(local_project_name: &str) -> Self {
        let mut name = local_project_name.to_string();
        if name.len() <= MIN_APP_NAME_LEN {
            name.push_str(APP_NAME_SUFFIX);
        }
        AppName(name)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AppName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AppName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a deployment run operates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Configure the project only; the user commits and pushes themselves.
    #[default]
    Configure,
    /// Also provision remote resources, commit, push, and open the app.
    AutomateAll,
}

impl RunMode {
    /// Construct from the CLI's `--automate-all` flag.
    pub fn from_automate_flag(automate_all: bool) -> Self {
        if automate_all {
            RunMode::AutomateAll
        } else {
            RunMode::Configure
        }
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, RunMode::AutomateAll)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Configure => write!(f, "configure"),
            RunMode::AutomateAll => write!(f, "automate-all"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_get_suffixed() {
        assert_eq!(AppName::derive_from_local("blog").0, "blog-deployed");
        assert_eq!(AppName::derive_from_local("a").0, "a-deployed");
        // Exactly at the boundary: still too short, still suffixed.
        assert_eq!(AppName::derive_from_local("sixsix").0, "sixsix-deployed");
    }

    #[test]
    fn long_names_pass_through_unchanged() {
        assert_eq!(AppName::derive_from_local("myblogapp").0, "myblogapp");
        assert_eq!(AppName::derive_from_local("sevense").0, "sevense");
    }

    #[test]
    fn derived_names_always_exceed_minimum() {
        for name in ["", "x", "blog", "sixsix", "myblogapp"] {
            let derived = AppName::derive_from_local(name);
            assert!(
                derived.0.len() > MIN_APP_NAME_LEN,
                "derived name '{derived}' too short for input '{name}'"
            );
        }
    }

    #[test]
    fn app_name_display() {
        assert_eq!(AppName::from("blog-deployed").to_string(), "blog-deployed");
    }

    #[test]
    fn run_mode_from_flag() {
        assert!(RunMode::from_automate_flag(true).is_automated());
        assert!(!RunMode::from_automate_flag(false).is_automated());
    }
}

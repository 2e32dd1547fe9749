//! Scripted [`CommandRunner`] for exercising platform flows without the real
//! Scalingo or git binaries. Used by this crate's tests and by the
//! orchestration crate's tests.

use std::cell::RefCell;
use std::path::Path;

use crate::error::CliError;
use crate::runner::{CommandOutput, CommandRunner};

struct Rule {
    contains: String,
    output: CommandOutput,
}

/// A [`CommandRunner`] that matches command lines against substring rules.
///
/// The first rule whose `contains` fragment appears in the rendered command
/// line wins; unmatched commands succeed with empty output. Every invocation
/// is recorded and retrievable via [`ScriptedRunner::calls`].
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `output` to any command line containing `fragment`.
    pub fn on(mut self, fragment: impl Into<String>, output: CommandOutput) -> Self {
        self.rules.push(Rule {
            contains: fragment.into(),
            output,
        });
        self
    }

    /// Rendered command lines, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command line contains `fragment`.
    pub fn saw(&self, fragment: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.contains(fragment))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput, CliError> {
        let line = format!("{program} {}", args.join(" "));
        self.calls.borrow_mut().push(line.clone());
        for rule in &self.rules {
            if line.contains(&rule.contains) {
                return Ok(rule.output.clone());
            }
        }
        Ok(CommandOutput::ok(""))
    }
}

//! Test utilities: a scripted, recording [`CommandRunner`].
//!
//! # Example
//!
//! ```rust,ignore
//! let mut runner = MockRunner::new();
//! runner.expect("g++ -v", MockProcessOutput::success("gcc version 4.1.2"));
//! runner.expect_prefix("pkg-config", MockProcessOutput::success(""));
//! ```

use anyhow::{bail, Result};

use crate::probe::{CommandOutput, CommandRunner, CommandSpec};

/// Scripted process output.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Pattern for matching commands in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Records every command it is asked to run and answers from expectations.
///
/// Expectations are checked in the order they were added; the first match
/// wins. A command with no matching expectation and no default fails as if
/// the program could not be started.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Vec<(CommandPattern, MockProcessOutput)>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// A runner on which every command succeeds. `--cflags` and `--libs`
    /// queries answer with plausible flags derived from the package name.
    pub fn all_present() -> Self {
        let mut runner = MockRunner::new();
        runner.set_default(MockProcessOutput::success(""));
        runner
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations
            .push((CommandPattern::Exact(cmd.to_string()), output));
        self
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations
            .push((CommandPattern::StartsWith(prefix.to_string()), output));
        self
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations
            .push((CommandPattern::Contains(substring.to_string()), output));
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Whether any command run so far contains `needle`.
    pub fn ran_any(&self, needle: &str) -> bool {
        self.calls.iter().any(|c| c.contains(needle))
    }

    fn answer(&self, cmd: &str) -> Option<MockProcessOutput> {
        if let Some((_, output)) = self.expectations.iter().find(|(p, _)| p.matches(cmd)) {
            return Some(output.clone());
        }

        let default = self.default_output.clone()?;
        let package = cmd.split_whitespace().nth(1).unwrap_or_default();
        if default.status == 0 && cmd.ends_with("--cflags") {
            return Some(MockProcessOutput::success(format!("-I/usr/include/{}\n", package)));
        }
        if default.status == 0 && cmd.ends_with("--libs") {
            return Some(MockProcessOutput::success(format!("-l{}\n", package)));
        }
        Some(default)
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, command: &CommandSpec) -> Result<CommandOutput> {
        let cmd = command.to_string();
        self.calls.push(cmd.clone());

        match self.answer(&cmd) {
            Some(output) => Ok(CommandOutput {
                status: Some(output.status),
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            None => bail!("failed to spawn `{}`: unexpected command", command.program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_and_answers() {
        let mut runner = MockRunner::new();
        runner
            .expect("jam -v", MockProcessOutput::success("Jam 2.5"))
            .expect_contains("osgcal", MockProcessOutput::failure(1, "too old"));

        let out = runner.run(&CommandSpec::new("jam", ["-v"])).unwrap();
        assert_eq!(out.stdout, "Jam 2.5");

        let out = runner
            .run(&CommandSpec::new("pkg-config", ["osgcal", "--atleast-version=0.1.41"]))
            .unwrap();
        assert_eq!(out.status, Some(1));

        assert!(runner.run(&CommandSpec::new("g++", ["-v"])).is_err());
        assert_eq!(runner.calls().len(), 3);
        assert!(runner.ran_any("osgcal"));
    }

    #[test]
    fn test_all_present_fabricates_flags() {
        let mut runner = MockRunner::all_present();
        let out = runner
            .run(&CommandSpec::new("pkg-config", ["cal3d", "--libs"]))
            .unwrap();
        assert_eq!(out.stdout, "-lcal3d\n");
    }
}

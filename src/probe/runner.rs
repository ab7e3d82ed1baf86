//! Command execution seam for probes.

use anyhow::Result;

use super::CommandSpec;
use crate::util::process::ProcessBuilder;

/// Exit status and captured output of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout with the trailing newline(s) removed, as used for rule values.
    pub fn stdout_value(&self) -> &str {
        self.stdout.trim_end_matches(['\n', '\r'])
    }
}

/// Runs a command to completion and captures its status and output.
///
/// An `Err` means the command could not be run at all (for example, the
/// program is not installed). A command that runs and fails is an `Ok`
/// with a nonzero status.
pub trait CommandRunner {
    fn run(&mut self, command: &CommandSpec) -> Result<CommandOutput>;
}

/// Runs commands as real child processes. No timeout is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &CommandSpec) -> Result<CommandOutput> {
        let output = ProcessBuilder::new(&command.program)
            .args(&command.args)
            .exec()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

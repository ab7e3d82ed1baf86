//! Executes probes and harvests flags, one dependency at a time.

use anyhow::{Context, Result};

use super::{CommandRunner, Dependency, FlagQuery, Resolution, ToolProbe};
use crate::core::errors::{DependencyMissing, ProbeFailure};
use crate::core::rules::FlagSet;
use crate::util::process::find_executable;
use crate::util::shell::{Shell, Status};

/// Runs probes through a [`CommandRunner`] and reports progress on a [`Shell`].
pub struct Prober<'a, R: CommandRunner> {
    runner: &'a mut R,
    shell: &'a Shell,
    commands_run: usize,
}

impl<'a, R: CommandRunner> Prober<'a, R> {
    pub fn new(runner: &'a mut R, shell: &'a Shell) -> Self {
        Prober {
            runner,
            shell,
            commands_run: 0,
        }
    }

    /// Number of external commands executed so far.
    pub fn commands_run(&self) -> usize {
        self.commands_run
    }

    /// Run a presence probe. Any outcome other than exit status 0 is a
    /// missing dependency, including a program that cannot be started.
    pub fn check(&mut self, probe: &ToolProbe) -> Result<(), DependencyMissing> {
        let command = probe.command.to_string();
        self.shell.verbose(format!("running `{}`", command));
        self.commands_run += 1;

        let failure = match self.runner.run(&probe.command) {
            Ok(output) if output.success() => {
                self.shell.status(Status::Found, &probe.label);
                if self.shell.is_verbose() {
                    if let Some(path) = find_executable(&probe.command.program) {
                        self.shell.verbose(format!("using {}", path.display()));
                    }
                }
                return Ok(());
            }
            Ok(output) => {
                tracing::debug!("`{}` failed: {}", command, output.stderr.trim_end());
                ProbeFailure::Exit(output.status)
            }
            Err(err) => ProbeFailure::Spawn(format!("{:#}", err)),
        };

        self.shell.status(Status::Missing, &probe.label);
        Err(DependencyMissing {
            label: probe.label.clone(),
            command,
            failure,
        })
    }

    /// Run a flag query and return its output as a rule value.
    ///
    /// The output is used even when the query exits nonzero; that only
    /// produces a warning.
    pub fn harvest(&mut self, query: &FlagQuery) -> Result<String> {
        let command = query.command.to_string();
        self.shell.verbose(format!("running `{}`", command));
        self.commands_run += 1;

        let output = self
            .runner
            .run(&query.command)
            .with_context(|| format!("failed to run flag query `{}`", command))?;

        if !output.success() {
            tracing::debug!("`{}` exited with {:?}", command, output.status);
            self.shell.warn(format!(
                "`{}` did not succeed; {} may be incomplete",
                command, query.key
            ));
        }

        Ok(output.stdout_value().to_string())
    }

    /// Resolve one dependency, queueing its statements in `flags`.
    ///
    /// Nothing is queued if the probe fails.
    pub fn resolve(&mut self, dependency: &Dependency, flags: &mut FlagSet) -> Result<()> {
        match &dependency.resolution {
            Resolution::Probed { probe, queries } => {
                self.check(probe)?;
                let mut harvested = Vec::with_capacity(queries.len());
                for query in queries {
                    harvested.push((query.key.as_str(), self.harvest(query)?));
                }
                for (key, value) in harvested {
                    flags.push_quoted(key, value);
                }
            }
            Resolution::Assumed { statements } => {
                self.shell.status(Status::Assumed, &dependency.name);
                for (key, value) in statements {
                    flags.push_quoted(key.as_str(), value.as_str());
                }
            }
        }
        Ok(())
    }
}

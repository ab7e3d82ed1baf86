//! Dependency probing.
//!
//! A probe asks an external program whether a tool or library is present
//! at an acceptable version and judges only by the exit status. Probes are
//! described as data ([`ToolProbe`], [`FlagQuery`]) and executed through a
//! [`CommandRunner`], so the pipeline never goes through a shell and tests
//! can substitute a recording runner.

pub mod catalog;
pub mod prober;
pub mod runner;

use std::fmt;

pub use catalog::{build_plan, ProbeGroup, ProbePlan, ToolPrograms};
pub use prober::Prober;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

/// A program plus its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Presence/version check. Exit status 0 means the dependency is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolProbe {
    pub label: String,
    pub command: CommandSpec,
}

/// Query whose standard output becomes a rule value verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagQuery {
    pub key: String,
    pub command: CommandSpec,
}

/// How a dependency is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Run the probe, then harvest flags with each query in order.
    Probed {
        probe: ToolProbe,
        queries: Vec<FlagQuery>,
    },
    /// No probe; the quoted statements are written as-is.
    Assumed { statements: Vec<(String, String)> },
}

/// A tool or library the build needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Display name, e.g. `Xerces-C` or `CEGUI-OpenGL`
    pub name: String,
    pub resolution: Resolution,
}

impl Dependency {
    /// A dependency that is only checked for presence.
    pub fn tool(label: impl Into<String>, command: CommandSpec) -> Self {
        let label = label.into();
        Dependency {
            name: label.clone(),
            resolution: Resolution::Probed {
                probe: ToolProbe { label, command },
                queries: Vec::new(),
            },
        }
    }
}

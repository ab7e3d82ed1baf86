//! Error types for configuration runs.
//!
//! Every variant here is terminal: the binary reports it and exits nonzero.
//! Plumbing failures (I/O on the rules file, unreadable config files) are
//! carried as `anyhow` errors with context instead.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// The requested build options cannot be turned into compiler flags.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("compilation mode not set (got `{mode}`)")]
    #[diagnostic(
        code(jamconf::config::invalid_mode),
        help("use `--mode D` (debug), `--mode O` (optimized) or `--mode F` (full optimization)")
    )]
    InvalidMode { mode: String },

    #[error("processor must be set for full optimization")]
    #[diagnostic(
        code(jamconf::config::missing_processor),
        help("pass `--processor <name>` (the gcc -march value) or set `build.processor`")
    )]
    MissingProcessor,

    #[error("invalid processor name `{processor}`")]
    #[diagnostic(
        code(jamconf::config::invalid_processor),
        help("processor names cannot contain whitespace, quotes or backslashes")
    )]
    InvalidProcessor { processor: String },
}

/// Why a presence probe did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The program ran and exited with a nonzero status (None if killed by a signal).
    Exit(Option<i32>),
    /// The program could not be started at all.
    Spawn(String),
}

/// A required tool or library is absent or older than required.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("required dependency `{label}` is missing or too old")]
#[diagnostic(
    code(jamconf::probe::missing),
    help("run the command above by hand to see why it failed")
)]
pub struct DependencyMissing {
    /// Dependency label, as shown in the progress output
    pub label: String,
    /// The exact command that was attempted
    pub command: String,
    pub failure: ProbeFailure,
}

/// The rules file does not end with the completeness marker.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("configuration incomplete, do not build: {}", .path.display())]
#[diagnostic(
    code(jamconf::rules::incomplete),
    help("run `jamconf` again and fix any reported problem before running `jam`")
)]
pub struct IncompleteRules {
    pub path: PathBuf,
    /// The file does not exist at all
    pub missing: bool,
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        with_help(Diagnostic::error(self.to_string()), self)
    }
}

impl DependencyMissing {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let reason = match &self.failure {
            ProbeFailure::Exit(Some(code)) => format!("exited with status {}", code),
            ProbeFailure::Exit(None) => "terminated by a signal".to_string(),
            ProbeFailure::Spawn(err) => format!("could not be started: {}", err),
        };
        let diag = Diagnostic::error(self.to_string())
            .with_context(self.command.clone())
            .with_context(reason);
        with_help(diag, self)
    }
}

impl IncompleteRules {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let reason = if self.missing {
            "the rules file does not exist"
        } else {
            "the completeness marker is absent; a previous run aborted part-way"
        };
        with_help(Diagnostic::error(self.to_string()).with_context(reason), self)
    }
}

fn with_help(diag: Diagnostic, err: &dyn MietteDiagnostic) -> Diagnostic {
    match err.help() {
        Some(help) => diag.with_suggestion(help.to_string()),
        None => diag,
    }
}

/// Render any error from a configuration run for the terminal.
///
/// Typed errors get their context lines and help text; anything else is
/// printed with its full `anyhow` context chain.
pub fn to_diagnostic(err: &anyhow::Error) -> Diagnostic {
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        e.to_diagnostic()
    } else if let Some(e) = err.downcast_ref::<DependencyMissing>() {
        e.to_diagnostic()
    } else if let Some(e) = err.downcast_ref::<IncompleteRules>() {
        e.to_diagnostic()
    } else {
        Diagnostic::error(format!("{:#}", err))
    }
}

//! Core types: build options, flag resolution, the rules file and errors.

pub mod errors;
pub mod flags;
pub mod options;
pub mod rules;

pub use errors::{ConfigError, DependencyMissing, IncompleteRules, ProbeFailure};
pub use flags::{resolve_flags, ResolvedFlags};
pub use options::{BuildOptions, CompileMode, OptionOverrides};
pub use rules::{FlagSet, RulesFile};

//! High-level operations invoked by the binary.

pub mod check;
pub mod configure;

pub use check::{check_rules_file, RulesSummary};
pub use configure::{configure, ConfigureReport};

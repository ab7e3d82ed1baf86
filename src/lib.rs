//! jamconf - configure a Jam-based C++ build
//!
//! This crate resolves compiler and linker flags from the requested build
//! mode, probes the environment for the required tools and libraries, and
//! writes the resulting `Jamrules` file for the Jam build tool.

pub mod core;
pub mod ops;
pub mod probe;
pub mod util;

/// Test utilities: a scripted command runner for probe tests.
#[cfg(test)]
pub mod test_support;

pub use self::core::{BuildOptions, CompileMode, ConfigError, DependencyMissing};
pub use ops::{check_rules_file, configure};
pub use probe::{CommandRunner, SystemRunner};

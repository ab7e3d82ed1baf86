//! Build options: what the operator asked for.
//!
//! Options are assembled from the command line, the environment and the
//! config files, then frozen into a [`BuildOptions`] value. Nothing here
//! validates semantics; an unknown mode letter is carried through untouched
//! and rejected later by the flag resolver.

use std::fmt;
use std::path::PathBuf;

use crate::probe::catalog::ToolPrograms;
use crate::util::config::Config;

/// Mode letter used when none is given anywhere.
pub const DEFAULT_MODE: &str = "O";

/// Rules file written when no other path is configured.
pub const DEFAULT_RULES_FILE: &str = "Jamrules";

/// Compiler flag profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// `D`: no optimization, full debug symbols
    Debug,
    /// `O`: moderate optimization, portable binary
    OptimizationCompat,
    /// `F`: aggressive optimization for one processor
    FullOptimization,
}

impl CompileMode {
    /// Map a mode letter to a mode. Letters are case-sensitive.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "D" => Some(CompileMode::Debug),
            "O" => Some(CompileMode::OptimizationCompat),
            "F" => Some(CompileMode::FullOptimization),
            _ => None,
        }
    }

    /// Human-readable label shown in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            CompileMode::Debug => "Debug",
            CompileMode::OptimizationCompat => "Optimization",
            CompileMode::FullOptimization => "Full optimization",
        }
    }
}

impl fmt::Display for CompileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Values given explicitly by the operator (command line or environment).
///
/// `None` means "not given here"; the config files and built-in defaults
/// fill the gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub mode: Option<String>,
    pub processor: Option<String>,
    pub client: Option<bool>,
    pub server: Option<bool>,
    pub bot: Option<bool>,
    pub rules_file: Option<PathBuf>,
}

/// Fully resolved build options. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Raw mode letter, validated by the flag resolver
    pub mode: String,
    /// Target processor; `None` when unset or empty
    pub processor: Option<String>,
    pub build_client: bool,
    pub build_server: bool,
    pub build_bot: bool,
    /// Where the rules file is written
    pub rules_file: PathBuf,
    /// Programs used by the tool probes
    pub tools: ToolPrograms,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            mode: DEFAULT_MODE.to_string(),
            processor: None,
            build_client: true,
            build_server: false,
            build_bot: false,
            rules_file: PathBuf::from(DEFAULT_RULES_FILE),
            tools: ToolPrograms::default(),
        }
    }
}

impl BuildOptions {
    /// Combine explicit overrides with config-file defaults.
    ///
    /// Precedence: overrides, then config, then built-in defaults. An empty
    /// processor string counts as unset at every layer.
    pub fn resolve(overrides: OptionOverrides, config: &Config) -> Self {
        let defaults = BuildOptions::default();

        let processor = non_empty(overrides.processor)
            .or_else(|| non_empty(config.build.processor.clone()));

        let mut tools = defaults.tools;
        if let Some(cxx) = &config.tools.cxx {
            tools.cxx = cxx.clone();
        }
        if let Some(jam) = &config.tools.jam {
            tools.jam = jam.clone();
        }
        if let Some(pkg_config) = &config.tools.pkg_config {
            tools.pkg_config = pkg_config.clone();
        }

        BuildOptions {
            mode: overrides
                .mode
                .or_else(|| config.build.mode.clone())
                .unwrap_or(defaults.mode),
            processor,
            build_client: overrides
                .client
                .or(config.build.client)
                .unwrap_or(defaults.build_client),
            build_server: overrides
                .server
                .or(config.build.server)
                .unwrap_or(defaults.build_server),
            build_bot: overrides
                .bot
                .or(config.build.bot)
                .unwrap_or(defaults.build_bot),
            rules_file: overrides
                .rules_file
                .or_else(|| config.build.rules_file.clone())
                .unwrap_or(defaults.rules_file),
            tools,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

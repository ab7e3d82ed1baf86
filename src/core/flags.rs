//! Flag resolution: turn build options into compiler and linker flags.

use crate::core::errors::ConfigError;
use crate::core::options::{BuildOptions, CompileMode};

/// Warnings and language settings shared by every mode.
pub const BASE_CXXFLAGS: &[&str] = &[
    "-pipe",
    "-ansi",
    "-std=c++98",
    "-Wall",
    "-Wextra",
    "-Wno-unused-parameter",
    "-Wpointer-arith",
    "-Wreturn-type",
    "-Wcast-qual",
    "-Wswitch",
    "-Wshadow",
    "-Wcast-align",
    "-Wwrite-strings",
    "-Wchar-subscripts",
    "-Wredundant-decls",
    "-Woverloaded-virtual",
    "-Wdeprecated",
];

pub const DEBUG_CXXFLAGS: &[&str] = &["-g3", "-O0"];

pub const OPTCOMPAT_CXXFLAGS: &[&str] = &["-g0", "-O2", "-ffast-math"];

pub const OPTFULL_CXXFLAGS: &[&str] = &["-g0", "-O3", "-ffast-math"];

/// Linker flags; identical for every mode.
pub const LDFLAGS: &[&str] = &["-lstdc++", "-lpthread", "-lm"];

/// Compiler and linker flags for one configuration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFlags {
    pub mode: CompileMode,
    /// Target processor; only set in full optimization mode
    pub processor: Option<String>,
    pub cxxflags: Vec<String>,
    pub ldflags: Vec<String>,
}

impl ResolvedFlags {
    /// Compiler flags as written to the rules file.
    pub fn cxxflags_string(&self) -> String {
        self.cxxflags.join(" ")
    }

    /// Linker flags as written to the rules file.
    pub fn ldflags_string(&self) -> String {
        self.ldflags.join(" ")
    }
}

/// Resolve the compiler and linker flags for the given options.
///
/// Fails without side effects when the mode letter is unknown, or when full
/// optimization is requested without a usable processor name.
pub fn resolve_flags(options: &BuildOptions) -> Result<ResolvedFlags, ConfigError> {
    let mode = CompileMode::from_letter(&options.mode).ok_or_else(|| ConfigError::InvalidMode {
        mode: options.mode.clone(),
    })?;

    let mut cxxflags: Vec<String> = BASE_CXXFLAGS.iter().map(|f| f.to_string()).collect();
    let mut processor = None;

    match mode {
        CompileMode::Debug => extend(&mut cxxflags, DEBUG_CXXFLAGS),
        CompileMode::OptimizationCompat => extend(&mut cxxflags, OPTCOMPAT_CXXFLAGS),
        CompileMode::FullOptimization => {
            let march = options
                .processor
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or(ConfigError::MissingProcessor)?;
            validate_processor(march)?;

            extend(&mut cxxflags, OPTFULL_CXXFLAGS);
            cxxflags.push(format!("-march={}", march));
            processor = Some(march.to_string());
        }
    }

    Ok(ResolvedFlags {
        mode,
        processor,
        cxxflags,
        ldflags: LDFLAGS.iter().map(|f| f.to_string()).collect(),
    })
}

fn extend(flags: &mut Vec<String>, extra: &[&str]) {
    flags.extend(extra.iter().map(|f| f.to_string()));
}

// The processor ends up inside a quoted rules-file value and on the
// compiler command line, so it must be a single plain token.
fn validate_processor(processor: &str) -> Result<(), ConfigError> {
    let bad = processor
        .chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\');
    if bad {
        return Err(ConfigError::InvalidProcessor {
            processor: processor.to_string(),
        });
    }
    Ok(())
}

//! Implementation of `jamconf --check`: the consumer-side completeness test.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::errors::IncompleteRules;
use crate::core::rules::{count_statements, is_complete};
use crate::util::fs;

/// Summary of a complete rules file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesSummary {
    pub path: PathBuf,
    pub statements: usize,
}

/// Verify that the rules file at `path` was written by a run that finished.
///
/// A missing file and a file without the completeness marker both fail
/// with [`IncompleteRules`]. Nothing is probed.
pub fn check_rules_file(path: &Path) -> Result<RulesSummary> {
    if !path.exists() {
        return Err(IncompleteRules {
            path: path.to_path_buf(),
            missing: true,
        }
        .into());
    }

    let contents = fs::read_to_string(path)?;
    if !is_complete(&contents) {
        tracing::debug!("{} lacks the completeness marker", path.display());
        return Err(IncompleteRules {
            path: path.to_path_buf(),
            missing: false,
        }
        .into());
    }

    Ok(RulesSummary {
        path: path.to_path_buf(),
        statements: count_statements(&contents),
    })
}

//! The generated Jam rules file.
//!
//! Statements accumulate in a [`FlagSet`] and are flushed to disk by
//! [`RulesFile::flush`] at every pipeline stage boundary. Each flush opens
//! the file in append mode, writes, and closes it again, so an aborted run
//! leaves every completed stage on disk and nothing of the failed one.
//!
//! Format, one statement per line:
//!
//! ```text
//! CXXFLAGS = "-pipe -ansi ..." ;
//! BUILD_CLIENT = yes ;
//! JAMRULES_COMPLETE = yes ;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs;

/// Key of the final statement, written only when every stage succeeded.
pub const COMPLETE_MARKER_KEY: &str = "JAMRULES_COMPLETE";

/// Statement terminator understood by Jam.
const TERMINATOR: &str = " ;";

/// Value side of a rules statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue {
    /// Bare word, e.g. `yes`
    Word(String),
    /// Quoted string, embedded verbatim between double quotes
    Quoted(String),
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Word(w) => f.write_str(w),
            RuleValue::Quoted(q) => write!(f, "\"{}\"", q),
        }
    }
}

/// One `KEY = value ;` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub key: String,
    pub value: RuleValue,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}{}", self.key, self.value, TERMINATOR)
    }
}

/// Ordered, write-only accumulator of statements awaiting a flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pending: Vec<Statement>,
}

impl FlagSet {
    pub fn new() -> Self {
        FlagSet::default()
    }

    /// Append `KEY = "value" ;`.
    pub fn push_quoted(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pending.push(Statement {
            key: key.into(),
            value: RuleValue::Quoted(value.into()),
        });
    }

    /// Append `KEY = word ;`.
    pub fn push_word(&mut self, key: impl Into<String>, word: impl Into<String>) {
        self.pending.push(Statement {
            key: key.into(),
            value: RuleValue::Word(word.into()),
        });
    }

    /// Append `KEY = yes ;` or `KEY = no ;`.
    pub fn push_toggle(&mut self, key: impl Into<String>, enabled: bool) {
        self.push_word(key, if enabled { "yes" } else { "no" });
    }

    /// Append the completeness marker.
    pub fn push_complete_marker(&mut self) {
        self.push_toggle(COMPLETE_MARKER_KEY, true);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Render all pending statements, one per line.
    pub fn render(&self) -> String {
        self.pending
            .iter()
            .map(|s| format!("{}\n", s))
            .collect()
    }
}

/// Writer for the rules file of one run.
#[derive(Debug)]
pub struct RulesFile {
    path: PathBuf,
    written: usize,
}

impl RulesFile {
    /// Start a fresh rules file at `path`, deleting any previous one.
    ///
    /// Returns the writer and whether an old file was removed.
    pub fn reset(path: impl Into<PathBuf>) -> Result<(Self, bool)> {
        let path = path.into();
        let removed = fs::remove_file_if_exists(&path)?;
        if removed {
            tracing::debug!("removed previous rules file {}", path.display());
        }
        Ok((RulesFile { path, written: 0 }, removed))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of statements written so far.
    pub fn statements_written(&self) -> usize {
        self.written
    }

    /// Append every pending statement to disk and clear the accumulator.
    pub fn flush(&mut self, set: &mut FlagSet) -> Result<usize> {
        if set.is_empty() {
            return Ok(0);
        }
        fs::append_string(&self.path, &set.render())?;

        let count = set.len();
        self.written += count;
        tracing::debug!("flushed {} statement(s) to {}", count, self.path.display());
        set.pending.clear();
        Ok(count)
    }
}

/// Whether rules-file contents end with the completeness marker.
pub fn is_complete(contents: &str) -> bool {
    let marker = Statement {
        key: COMPLETE_MARKER_KEY.to_string(),
        value: RuleValue::Word("yes".to_string()),
    }
    .to_string();

    contents
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim() == marker)
        .unwrap_or(false)
}

/// Count the statements in rules-file contents.
pub fn count_statements(contents: &str) -> usize {
    contents
        .lines()
        .filter(|line| line.trim_end().ends_with(TERMINATOR))
        .count()
}

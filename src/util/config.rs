//! Configuration file support for jamconf.
//!
//! jamconf reads two optional configuration files:
//! - Global: `~/.jamconf/config.toml` - User-wide defaults
//! - Project: `.jamconf/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both. A file that exists but cannot be parsed
//! is an error; a missing file is not.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the per-user and per-project config directory.
pub const CONFIG_DIR_NAME: &str = ".jamconf";

/// jamconf configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default build options
    pub build: BuildConfig,

    /// Program overrides for tool probes
    pub tools: ToolsConfig,
}

/// Defaults for the build options normally given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Compilation mode letter (D, O or F)
    pub mode: Option<String>,

    /// Target processor for full optimization (value for `-march`)
    pub processor: Option<String>,

    /// Build the client module
    pub client: Option<bool>,

    /// Build the server module
    pub server: Option<bool>,

    /// Build the bot module
    pub bot: Option<bool>,

    /// Output path of the generated rules file
    pub rules_file: Option<PathBuf>,
}

/// Program names used when probing tools.
///
/// Only the program changes; the probe label and its arguments stay fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// C++ compiler (e.g., /usr/bin/g++-4.9)
    pub cxx: Option<String>,

    /// Jam build tool (e.g., bjam)
    pub jam: Option<String>,

    /// pkg-config compatible query utility (e.g., pkgconf)
    pub pkg_config: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.mode.is_some() {
            self.build.mode = other.build.mode;
        }
        if other.build.processor.is_some() {
            self.build.processor = other.build.processor;
        }
        if other.build.client.is_some() {
            self.build.client = other.build.client;
        }
        if other.build.server.is_some() {
            self.build.server = other.build.server;
        }
        if other.build.bot.is_some() {
            self.build.bot = other.build.bot;
        }
        if other.build.rules_file.is_some() {
            self.build.rules_file = other.build.rules_file;
        }

        if other.tools.cxx.is_some() {
            self.tools.cxx = other.tools.cxx;
        }
        if other.tools.jam.is_some() {
            self.tools.jam = other.tools.jam;
        }
        if other.tools.pkg_config.is_some() {
            self.tools.pkg_config = other.tools.pkg_config;
        }
    }
}

/// Get the global jamconf config path (~/.jamconf/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Get the project config path (.jamconf/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.jamconf/config.toml)
/// 2. Global config (~/.jamconf/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_if_exists(global_path)?);
    }

    config.merge(Config::load_if_exists(project_path)?);

    Ok(config)
}

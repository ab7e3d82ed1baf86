//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use jamconf::core::OptionOverrides;

/// jamconf - probe the build environment and generate Jamrules
#[derive(Parser, Debug)]
#[command(name = "jamconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Compilation mode: O|F|D (Optimization|Full optimization|Debug) [default: O]
    #[arg(short, long, env = "JAMCONF_MODE", value_name = "MODE")]
    pub mode: Option<String>,

    /// Target processor; in full optimization mode, the value for gcc's `-march`
    #[arg(short, long, env = "JAMCONF_PROCESSOR", value_name = "NAME")]
    pub processor: Option<String>,

    /// Build the client [default]
    #[arg(short = 'c', long, overrides_with = "without_client")]
    pub with_client: bool,

    /// Don't build the client
    #[arg(short = 'C', long, overrides_with = "with_client")]
    pub without_client: bool,

    /// Build the server
    #[arg(short = 's', long, overrides_with = "without_server")]
    pub with_server: bool,

    /// Don't build the server [default]
    #[arg(short = 'S', long, overrides_with = "with_server")]
    pub without_server: bool,

    /// Build the bot
    #[arg(short = 'b', long, overrides_with = "without_bot")]
    pub with_bot: bool,

    /// Don't build the bot [default]
    #[arg(short = 'B', long, overrides_with = "with_bot")]
    pub without_bot: bool,

    /// Path of the generated rules file [default: Jamrules]
    #[arg(long, value_name = "PATH")]
    pub rules_file: Option<PathBuf>,

    /// Only check that an existing rules file is complete; probe nothing
    #[arg(long)]
    pub check: bool,

    /// Show every command as it runs
    #[arg(short, long)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// The build options given explicitly on the command line or in the environment.
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            mode: self.mode.clone(),
            processor: self.processor.clone(),
            client: toggle(self.with_client, self.without_client),
            server: toggle(self.with_server, self.without_server),
            bot: toggle(self.with_bot, self.without_bot),
            rules_file: self.rules_file.clone(),
        }
    }
}

fn toggle(with: bool, without: bool) -> Option<bool> {
    if with {
        Some(true)
    } else if without {
        Some(false)
    } else {
        None
    }
}

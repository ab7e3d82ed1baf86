//! jamconf CLI - configure a Jam-based C++ build

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use jamconf::core::errors::to_diagnostic;
use jamconf::core::BuildOptions;
use jamconf::ops::{check_rules_file, configure};
use jamconf::probe::SystemRunner;
use jamconf::util::config::{global_config_path, load_config, project_config_path};
use jamconf::util::diagnostic;
use jamconf::util::shell::{Shell, Status};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        diagnostic::emit(&to_diagnostic(&e), color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.quiet {
        EnvFilter::new("jamconf=error")
    } else if cli.verbose {
        EnvFilter::new("jamconf=debug")
    } else {
        EnvFilter::new("jamconf=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .init();

    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd))?;
    let options = BuildOptions::resolve(cli.overrides(), &config);
    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.no_color);

    if cli.check {
        let summary = check_rules_file(&options.rules_file)?;
        shell.status(
            Status::Finished,
            format!(
                "{} is complete ({} statements)",
                summary.path.display(),
                summary.statements
            ),
        );
        return Ok(());
    }

    let report = configure(&options, &mut SystemRunner, &shell)?;
    tracing::debug!(
        "wrote {} statements to {} after {} commands",
        report.statements,
        report.rules_file.display(),
        report.commands_run
    );
    Ok(())
}

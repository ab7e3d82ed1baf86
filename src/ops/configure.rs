//! Implementation of a configuration run.
//!
//! The pipeline is strictly linear:
//!
//! 1. delete any previous rules file
//! 2. resolve compiler and linker flags, flush them
//! 3. write the module toggles, flush them
//! 4. resolve every dependency in plan order, flushing after each one
//! 5. write the completeness marker
//!
//! The first failure ends the run. Whatever was flushed before it stays on
//! disk, but the completeness marker is never written.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::flags::resolve_flags;
use crate::core::options::{BuildOptions, CompileMode};
use crate::core::rules::{FlagSet, RulesFile};
use crate::probe::{build_plan, CommandRunner, Prober};
use crate::util::shell::{Shell, Status};

/// Outcome of a successful configuration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureReport {
    pub rules_file: PathBuf,
    pub mode: CompileMode,
    /// Statements written, including the completeness marker
    pub statements: usize,
    /// External commands executed
    pub commands_run: usize,
}

/// Configure the build and write the rules file.
pub fn configure<R: CommandRunner>(
    options: &BuildOptions,
    runner: &mut R,
    shell: &Shell,
) -> Result<ConfigureReport> {
    shell.note(format!(
        "configuring build (output: {})",
        options.rules_file.display()
    ));
    let (mut rules, removed) = RulesFile::reset(&options.rules_file)?;
    if removed {
        shell.status(Status::Removed, options.rules_file.display());
    }

    let mut flags = FlagSet::new();

    let resolved = resolve_flags(options)?;
    shell.status(Status::Info, format!("building mode: {}", resolved.mode));
    if let Some(processor) = &resolved.processor {
        shell.status(Status::Info, format!("target processor: {}", processor));
    }
    shell.verbose(format!("compile flags: {}", resolved.cxxflags_string()));
    flags.push_quoted("CXXFLAGS", resolved.cxxflags_string());
    flags.push_quoted("LDFLAGS", resolved.ldflags_string());
    rules.flush(&mut flags)?;

    let modules = [
        ("client", "BUILD_CLIENT", options.build_client),
        ("server", "BUILD_SERVER", options.build_server),
        ("bot", "BUILD_BOT", options.build_bot),
    ];
    let enabled: Vec<&str> = modules
        .iter()
        .filter(|(_, _, on)| *on)
        .map(|(name, _, _)| *name)
        .collect();
    shell.status(
        Status::Info,
        format!(
            "modules to build: {}",
            if enabled.is_empty() {
                "(none)".to_string()
            } else {
                enabled.join(", ")
            }
        ),
    );
    for (_, key, on) in modules {
        flags.push_toggle(key, on);
    }
    rules.flush(&mut flags)?;

    let plan = build_plan(options);
    let mut prober = Prober::new(runner, shell);
    plan.groups.iter().try_for_each(|group| {
        shell.status(Status::Checking, group.title());
        group.dependencies.iter().try_for_each(|dependency| {
            prober.resolve(dependency, &mut flags)?;
            rules.flush(&mut flags).map(|_| ())
        })
    })?;
    let commands_run = prober.commands_run();

    flags.push_complete_marker();
    rules.flush(&mut flags)?;

    shell.status(
        Status::Writing,
        format!(
            "{} ({} statements)",
            rules.path().display(),
            rules.statements_written()
        ),
    );
    shell.status(
        Status::Finished,
        "everything seems all right, now type `jam` to compile",
    );

    Ok(ConfigureReport {
        rules_file: rules.path().to_path_buf(),
        mode: resolved.mode,
        statements: rules.statements_written(),
        commands_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ConfigError, DependencyMissing};
    use crate::core::flags::{BASE_CXXFLAGS, OPTCOMPAT_CXXFLAGS};
    use crate::core::rules::is_complete;
    use crate::test_support::{MockProcessOutput, MockRunner};
    use tempfile::TempDir;

    fn options_in(tmp: &TempDir) -> BuildOptions {
        BuildOptions {
            rules_file: tmp.path().join("Jamrules"),
            ..Default::default()
        }
    }

    fn read(options: &BuildOptions) -> String {
        std::fs::read_to_string(&options.rules_file).unwrap_or_default()
    }

    #[test]
    fn test_default_client_build_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        let mut runner = MockRunner::all_present();

        let report = configure(&options, &mut runner, &Shell::quiet()).unwrap();

        let contents = read(&options);
        let cxxflags = [BASE_CXXFLAGS, OPTCOMPAT_CXXFLAGS].concat().join(" ");
        let expected = format!(
            "CXXFLAGS = \"{}\" ;\n\
             LDFLAGS = \"-lstdc++ -lpthread -lm\" ;\n\
             BUILD_CLIENT = yes ;\n\
             BUILD_SERVER = no ;\n\
             BUILD_BOT = no ;\n\
             XERCES.AVAILABLE = \"yes\" ;\n\
             XERCES.CXXFLAGS = \"\" ;\n\
             XERCES.LDFLAGS = \"-lxerces-c\" ;\n\
             OSG.CXXFLAGS = \"-I/usr/include/openscenegraph\" ;\n\
             OSG.LDFLAGS = \"-lopenscenegraph\" ;\n\
             CEGUI.CXXFLAGS = \"-I/usr/include/CEGUI-0\" ;\n\
             CEGUI.LDFLAGS = \"-lCEGUI-0\" ;\n\
             CEGUIOPENGL.CXXFLAGS = \"-I/usr/include/CEGUI-0-OPENGL\" ;\n\
             CEGUIOPENGL.LDFLAGS = \"-lCEGUI-0-OPENGL\" ;\n\
             OSGCAL.CXXFLAGS = \"-I/usr/include/osgcal\" ;\n\
             OSGCAL.LDFLAGS = \"-losgcal\" ;\n\
             CAL3D.CXXFLAGS = \"-I/usr/include/cal3d\" ;\n\
             CAL3D.LDFLAGS = \"-lcal3d\" ;\n\
             JAMRULES_COMPLETE = yes ;\n",
            cxxflags
        );
        assert_eq!(contents, expected);

        assert_eq!(report.mode, CompileMode::OptimizationCompat);
        assert_eq!(report.statements, 19);
        // 3 tools + 5 libraries x (probe + 2 queries)
        assert_eq!(report.commands_run, 18);
        assert_eq!(runner.calls()[0], "g++ -v");
    }

    #[test]
    fn test_previous_rules_file_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        std::fs::write(&options.rules_file, "STALE = yes ;\n").unwrap();

        configure(&options, &mut MockRunner::all_present(), &Shell::quiet()).unwrap();

        let contents = read(&options);
        assert!(!contents.contains("STALE"));
        assert!(contents.starts_with("CXXFLAGS = "));
    }

    #[test]
    fn test_full_mode_without_processor_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            mode: "F".to_string(),
            ..options_in(&tmp)
        };
        std::fs::write(&options.rules_file, "JAMRULES_COMPLETE = yes ;\n").unwrap();
        let mut runner = MockRunner::all_present();

        let err = configure(&options, &mut runner, &Shell::quiet()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MissingProcessor)
        );
        assert!(!options.rules_file.exists());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_full_mode_with_processor() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            mode: "F".to_string(),
            processor: Some("athlon64".to_string()),
            ..options_in(&tmp)
        };

        let report = configure(&options, &mut MockRunner::all_present(), &Shell::quiet()).unwrap();

        assert_eq!(report.mode, CompileMode::FullOptimization);
        let first = read(&options).lines().next().unwrap().to_string();
        assert!(first.ends_with("-g0 -O3 -ffast-math -march=athlon64\" ;"));
    }

    #[test]
    fn test_invalid_mode_fails_before_probing() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            mode: "X".to_string(),
            ..options_in(&tmp)
        };
        let mut runner = MockRunner::all_present();

        let err = configure(&options, &mut runner, &Shell::quiet()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidMode { .. })
        ));
        assert!(runner.calls().is_empty());
        assert!(!is_complete(&read(&options)));
    }

    #[test]
    fn test_without_client_runs_no_client_probes() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            build_client: false,
            ..options_in(&tmp)
        };
        let mut runner = MockRunner::all_present();

        configure(&options, &mut runner, &Shell::quiet()).unwrap();

        assert_eq!(runner.calls(), ["g++ -v", "jam -v", "pkg-config --version"]);
        let contents = read(&options);
        assert!(contents.contains("BUILD_CLIENT = no ;"));
        assert!(!contents.contains("OSG."));
        assert!(is_complete(&contents));
    }

    #[test]
    fn test_server_build_probes_osg_and_writes_postgresql() {
        let tmp = TempDir::new().unwrap();
        let options = BuildOptions {
            build_client: false,
            build_server: true,
            ..options_in(&tmp)
        };
        let mut runner = MockRunner::all_present();

        configure(&options, &mut runner, &Shell::quiet()).unwrap();

        assert!(runner.ran_any("openscenegraph --atleast-version=1.0.0"));
        assert!(!runner.ran_any("CEGUI"));
        let contents = read(&options);
        assert!(contents.contains("BUILD_SERVER = yes ;"));
        assert!(contents.contains("POSTGRESQL.CXXFLAGS = \"-DHAVE_POSTGRESQL\" ;"));
        assert!(contents.contains("POSTGRESQL.LDFLAGS = \"-lpq\" ;"));
    }

    #[test]
    fn test_without_server_writes_no_database_entries() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);

        configure(&options, &mut MockRunner::all_present(), &Shell::quiet()).unwrap();

        assert!(!read(&options).contains("POSTGRESQL"));
    }

    #[test]
    fn test_bot_only_changes_toggle() {
        let tmp = TempDir::new().unwrap();
        let without = options_in(&tmp);
        let mut runner_without = MockRunner::all_present();
        configure(&without, &mut runner_without, &Shell::quiet()).unwrap();
        let contents_without = read(&without);

        let with = BuildOptions {
            build_bot: true,
            ..options_in(&tmp)
        };
        let mut runner_with = MockRunner::all_present();
        configure(&with, &mut runner_with, &Shell::quiet()).unwrap();
        let contents_with = read(&with);

        assert_eq!(runner_without.calls(), runner_with.calls());
        assert_eq!(
            contents_without.replace("BUILD_BOT = no ;", "BUILD_BOT = yes ;"),
            contents_with
        );
    }

    #[test]
    fn test_missing_compiler_stops_everything() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        let mut runner = MockRunner::all_present();
        runner.expect("g++ -v", MockProcessOutput::failure(127, "g++: not found"));

        let err = configure(&options, &mut runner, &Shell::quiet()).unwrap_err();

        let missing = err.downcast_ref::<DependencyMissing>().unwrap();
        assert_eq!(missing.label, "G++");
        assert_eq!(missing.command, "g++ -v");
        assert_eq!(runner.calls(), ["g++ -v"]);

        let contents = read(&options);
        assert!(contents.contains("CXXFLAGS = "));
        assert!(contents.contains("BUILD_BOT = no ;"));
        assert!(!contents.contains("XERCES"));
        assert!(!contents.contains(".CXXFLAGS"));
        assert!(!is_complete(&contents));
    }

    #[test]
    fn test_missing_library_keeps_earlier_entries() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        let mut runner = MockRunner::all_present();
        runner.expect(
            "pkg-config CEGUI-0-OPENGL --atleast-version=0.5.0",
            MockProcessOutput::failure(1, ""),
        );

        let err = configure(&options, &mut runner, &Shell::quiet()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DependencyMissing>().unwrap().label,
            "CEGUI-OpenGL"
        );

        assert!(!runner.ran_any("osgcal"));
        assert!(!runner.ran_any("cal3d"));

        let contents = read(&options);
        assert!(contents.contains("CEGUI.LDFLAGS = "));
        assert!(!contents.contains("CEGUIOPENGL."));
        assert!(!is_complete(&contents));
    }
}

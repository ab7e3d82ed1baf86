//! The fixed catalog of tools and libraries, and the ordered plan built from it.

use super::{CommandSpec, Dependency, FlagQuery, Resolution, ToolProbe};
use crate::core::options::BuildOptions;

/// Programs used by the tool probes. Overridable from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPrograms {
    pub cxx: String,
    pub jam: String,
    pub pkg_config: String,
}

impl Default for ToolPrograms {
    fn default() -> Self {
        ToolPrograms {
            cxx: "g++".to_string(),
            jam: "jam".to_string(),
            pkg_config: "pkg-config".to_string(),
        }
    }
}

/// A library located through pkg-config.
#[derive(Debug, Clone, Copy)]
struct PkgConfigLibrary {
    label: &'static str,
    package: &'static str,
    min_version: &'static str,
    rule_prefix: &'static str,
}

const OSG: PkgConfigLibrary = PkgConfigLibrary {
    label: "OSG",
    package: "openscenegraph",
    min_version: "1.0.0",
    rule_prefix: "OSG",
};

const CEGUI: PkgConfigLibrary = PkgConfigLibrary {
    label: "CEGUI",
    package: "CEGUI-0",
    min_version: "0.8.0",
    rule_prefix: "CEGUI",
};

const CEGUI_OPENGL: PkgConfigLibrary = PkgConfigLibrary {
    label: "CEGUI-OpenGL",
    package: "CEGUI-0-OPENGL",
    min_version: "0.5.0",
    rule_prefix: "CEGUIOPENGL",
};

const OSGCAL: PkgConfigLibrary = PkgConfigLibrary {
    label: "OSGCAL",
    package: "osgcal",
    min_version: "0.1.41",
    rule_prefix: "OSGCAL",
};

const CAL3D: PkgConfigLibrary = PkgConfigLibrary {
    label: "CAL3D",
    package: "cal3d",
    min_version: "0.11",
    rule_prefix: "CAL3D",
};

/// Client libraries, in probing order.
const CLIENT_LIBRARIES: &[PkgConfigLibrary] = &[OSG, CEGUI, CEGUI_OPENGL, OSGCAL, CAL3D];

impl PkgConfigLibrary {
    fn dependency(&self, pkg_config: &str) -> Dependency {
        let query = |suffix: &str, flag: &str| FlagQuery {
            key: format!("{}.{}", self.rule_prefix, suffix),
            command: CommandSpec::new(pkg_config, [self.package, flag]),
        };

        Dependency {
            name: self.label.to_string(),
            resolution: Resolution::Probed {
                probe: ToolProbe {
                    label: self.label.to_string(),
                    command: CommandSpec::new(
                        pkg_config,
                        [
                            self.package.to_string(),
                            format!("--atleast-version={}", self.min_version),
                        ],
                    ),
                },
                queries: vec![query("CXXFLAGS", "--cflags"), query("LDFLAGS", "--libs")],
            },
        }
    }
}

fn assumed(name: &str, prefix: &str, cxxflags: &str, ldflags: &str) -> Dependency {
    Dependency {
        name: name.to_string(),
        resolution: Resolution::Assumed {
            statements: vec![
                (format!("{}.AVAILABLE", prefix), "yes".to_string()),
                (format!("{}.CXXFLAGS", prefix), cxxflags.to_string()),
                (format!("{}.LDFLAGS", prefix), ldflags.to_string()),
            ],
        },
    }
}

/// Which part of the build a group of dependencies serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Tools,
    Common,
    Client,
    Server,
}

/// Dependencies that are resolved together under one heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeGroup {
    pub kind: GroupKind,
    pub dependencies: Vec<Dependency>,
}

impl ProbeGroup {
    /// Heading shown before the group is resolved.
    pub fn title(&self) -> &'static str {
        match self.kind {
            GroupKind::Tools => "tools",
            GroupKind::Common => "common libraries",
            GroupKind::Client => "client libraries",
            GroupKind::Server => "server libraries",
        }
    }
}

/// Ordered list of every dependency a run resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    pub groups: Vec<ProbeGroup>,
}

impl ProbePlan {
    /// Every dependency in declared order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.groups.iter().flat_map(|g| g.dependencies.iter())
    }

    /// Every probe command in declared order, including flag queries.
    pub fn commands(&self) -> Vec<String> {
        let mut commands = Vec::new();
        for dep in self.dependencies() {
            if let Resolution::Probed { probe, queries } = &dep.resolution {
                commands.push(probe.command.to_string());
                commands.extend(queries.iter().map(|q| q.command.to_string()));
            }
        }
        commands
    }
}

/// Build the ordered probe plan for the given options.
///
/// Order: tools, common libraries, client libraries (if building the
/// client), server libraries (if building the server). OSG serves both the
/// client and the server; it is resolved once, in the first group that
/// needs it. The bot module adds nothing.
pub fn build_plan(options: &BuildOptions) -> ProbePlan {
    let tools = &options.tools;
    let mut groups = vec![
        ProbeGroup {
            kind: GroupKind::Tools,
            dependencies: vec![
                Dependency::tool("G++", CommandSpec::new(tools.cxx.as_str(), ["-v"])),
                Dependency::tool("Jam", CommandSpec::new(tools.jam.as_str(), ["-v"])),
                Dependency::tool(
                    "pkg-config",
                    CommandSpec::new(tools.pkg_config.as_str(), ["--version"]),
                ),
            ],
        },
        ProbeGroup {
            kind: GroupKind::Common,
            dependencies: vec![assumed("Xerces-C", "XERCES", "", "-lxerces-c")],
        },
    ];

    if options.build_client {
        groups.push(ProbeGroup {
            kind: GroupKind::Client,
            dependencies: CLIENT_LIBRARIES
                .iter()
                .map(|lib| lib.dependency(&tools.pkg_config))
                .collect(),
        });
    }

    if options.build_server {
        let mut dependencies = Vec::new();
        if !options.build_client {
            dependencies.push(OSG.dependency(&tools.pkg_config));
        }
        dependencies.push(assumed(
            "PostgreSQL",
            "POSTGRESQL",
            "-DHAVE_POSTGRESQL",
            "-lpq",
        ));
        groups.push(ProbeGroup {
            kind: GroupKind::Server,
            dependencies,
        });
    }

    ProbePlan { groups }
}

//! Turns user intents into [`CommandSpec`]s.
//!
//! The dispatcher only plans. Launching is left to a
//! [`Runner`](crate::runner::Runner), which keeps this module free of
//! processes and easy to check.

use std::env;

use log::debug;

use crate::command_spec::CommandSpec;
use crate::error::{Error, Result};
use crate::project::{ProjectState, SelectedProject};

const UNIX_INSTALL_SCRIPT: &str = "https://astral.sh/uv/install.sh";
const WINDOWS_INSTALL_SCRIPT: &str = "https://astral.sh/uv/install.ps1";

/// Characters of a version constraint that separate it from the package name
const CONSTRAINT_OPERATORS: [char; 3] = ['<', '>', '='];

/// What to do once a run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterRun {
    Nothing,
    RefreshDependencies,
}

/// A planned command and its follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub spec: CommandSpec,
    pub after: AfterRun,
}

/// Operating system family, as far as installing `uv` is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
    Unsupported(String),
}

impl Platform {
    /// Maps a system name such as `linux`, `Darwin` or `windows`.
    pub fn from_system_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linux" | "macos" | "darwin" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" => {
                Self::Unix
            }
            "windows" => Self::Windows,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    pub fn current() -> Self {
        Self::from_system_name(env::consts::OS)
    }
}

/// The install command, and what to try when it cannot be launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub primary: CommandSpec,
    pub fallback: Option<CommandSpec>,
}

/// Options for `uv add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRequest {
    pub dependencies: Vec<String>,
    pub upgrade: bool,
    pub verbose: bool,
    pub index_url: Option<String>,
}

impl AddRequest {
    /// A request for the whitespace separated dependencies in `input`.
    pub fn from_input(input: &str) -> Self {
        Self {
            dependencies: input.split_whitespace().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    fn index_url(&self) -> Option<&str> {
        self.index_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Extracts the package name from a dependency entry like `requests>=2.0,<3.0`.
///
/// Every constraint operator is replaced by a space and the first word is the
/// name. Returns `None` if nothing is left.
pub fn dependency_name(entry: &str) -> Option<String> {
    entry
        .replace(CONSTRAINT_OPERATORS, " ")
        .split_whitespace()
        .next()
        .map(ToString::to_string)
}

/// Builds the commands for every user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDispatcher {
    uv_binary: String,
}

impl CommandDispatcher {
    pub fn new(uv_binary: impl Into<String>) -> Self {
        Self {
            uv_binary: uv_binary.into(),
        }
    }

    /// The install command for `platform`.
    ///
    /// `has_program` tells whether a program is available; on Unix the
    /// downloader that is present goes first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] for an unknown platform.
    pub fn install_plan(
        &self,
        platform: &Platform,
        has_program: impl Fn(&str) -> bool,
    ) -> Result<InstallPlan> {
        match platform {
            Platform::Unix => {
                let curl = CommandSpec::shell(format!("curl -LsSf {UNIX_INSTALL_SCRIPT} | sh"));
                let wget = CommandSpec::shell(format!("wget -qO- {UNIX_INSTALL_SCRIPT} | sh"));

                if !has_program("curl") && has_program("wget") {
                    debug!("curl is missing, installing with wget");
                    Ok(InstallPlan {
                        primary: wget,
                        fallback: None,
                    })
                } else {
                    Ok(InstallPlan {
                        primary: curl,
                        fallback: Some(wget),
                    })
                }
            }
            Platform::Windows => Ok(InstallPlan {
                primary: CommandSpec::shell(format!(
                    "powershell -ExecutionPolicy ByPass -c \"irm {WINDOWS_INSTALL_SCRIPT} | iex\""
                )),
                fallback: None,
            }),
            Platform::Unsupported(name) => Err(Error::UnsupportedPlatform(name.clone())),
        }
    }

    pub fn upgrade(&self) -> Dispatch {
        Dispatch {
            spec: self.uv(["self", "update"]),
            after: AfterRun::Nothing,
        }
    }

    /// `uv init . --python=<version>` in the project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoProjectSelected`] without a selected project.
    pub fn init(&self, project: &ProjectState, python_version: &str) -> Result<Dispatch> {
        let project = project.require()?;
        let python = format!("--python={python_version}");

        Ok(self.in_project(project, self.uv(["init", ".", python.as_str()])))
    }

    /// `uv add [-v] [-U] <dependencies...> [-i <index url>]` in the project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoProjectSelected`] without a selected project, and
    /// [`Error::NoDependencies`] for an empty request.
    pub fn add(&self, project: &ProjectState, request: &AddRequest) -> Result<Dispatch> {
        let project = project.require()?;
        if request.dependencies.is_empty() {
            return Err(Error::NoDependencies);
        }

        let mut arguments = vec![self.uv_binary.clone(), "add".to_string()];
        if request.verbose {
            arguments.push("-v".to_string());
        }
        if request.upgrade {
            arguments.push("-U".to_string());
        }
        arguments.extend(request.dependencies.iter().cloned());
        if let Some(index_url) = request.index_url() {
            arguments.extend(["-i".to_string(), index_url.to_string()]);
        }

        Ok(self.in_project(project, CommandSpec::argv(arguments)))
    }

    /// `uv remove <name>` for a displayed dependency entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoProjectSelected`] without a selected project, and
    /// [`Error::InvalidDependencyEntry`] if the entry has no package name.
    pub fn remove(&self, project: &ProjectState, entry: &str) -> Result<Dispatch> {
        let project = project.require()?;
        let name = dependency_name(entry)
            .ok_or_else(|| Error::InvalidDependencyEntry(entry.to_string()))?;

        Ok(self.in_project(project, self.uv(["remove", name.as_str()])))
    }

    fn uv<'a>(&self, arguments: impl IntoIterator<Item = &'a str>) -> CommandSpec {
        let mut tokens = vec![self.uv_binary.clone()];
        tokens.extend(arguments.into_iter().map(ToString::to_string));
        CommandSpec::argv(tokens)
    }

    fn in_project(&self, project: &SelectedProject, spec: CommandSpec) -> Dispatch {
        Dispatch {
            spec: spec
                .in_directory(project.directory())
                .with_env("VIRTUAL_ENV", project.venv_path().display().to_string()),
            after: AfterRun::RefreshDependencies,
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_UV_BINARY)
    }
}

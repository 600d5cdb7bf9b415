use std::env;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;

use crate::config::{DEFAULT_SHELL, SHELL_COMMAND_FLAG};
use crate::error::{Error, Result};

/// How a command is handed to the operating system.
///
/// A command is either an argument vector executed directly, or a single
/// command line interpreted by the platform shell. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Argv(Vec<String>),
    Shell(String),
}

/// A fully resolved external command: what to run, where, and with which
/// extra environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub invocation: Invocation,
    pub working_directory: Option<PathBuf>,
    pub environment: IndexMap<String, String>,
}

impl CommandSpec {
    pub fn argv<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_invocation(Invocation::Argv(
            arguments.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn shell(command_line: impl Into<String>) -> Self {
        Self::from_invocation(Invocation::Shell(command_line.into()))
    }

    fn from_invocation(invocation: Invocation) -> Self {
        Self {
            invocation,
            working_directory: None,
            environment: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn in_directory(mut self, working_directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(working_directory.into());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.environment.insert(key.into(), value.into());
        self
    }

    /// The argument tokens, or `None` for a shell command line.
    pub fn arguments(&self) -> Option<&[String]> {
        match &self.invocation {
            Invocation::Argv(arguments) => Some(arguments),
            Invocation::Shell(_) => None,
        }
    }

    pub fn is_shell(&self) -> bool {
        matches!(self.invocation, Invocation::Shell(_))
    }

    /// Builds the `std::process::Command` for this spec.
    ///
    /// Stdio is left untouched; the runner decides where output goes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCommand`] for an empty argument vector.
    pub fn to_command(&self) -> Result<Command> {
        let mut command = match &self.invocation {
            Invocation::Argv(arguments) => {
                let (program, rest) = arguments.split_first().ok_or(Error::EmptyCommand)?;
                let mut command = Command::new(program);
                command.args(rest);
                command
            }
            Invocation::Shell(command_line) => {
                if command_line.trim().is_empty() {
                    return Err(Error::EmptyCommand);
                }
                let mut command = Command::new(DEFAULT_SHELL);
                command.arg(SHELL_COMMAND_FLAG);
                append_shell_line(&mut command, command_line);
                command
            }
        };

        if let Some(working_directory) = &self.working_directory {
            command.current_dir(working_directory);
        }
        command.envs(&self.environment);

        Ok(command)
    }
}

impl Display for CommandSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.invocation {
            Invocation::Argv(arguments) => formatter.write_str(arguments.join(" ").as_str()),
            Invocation::Shell(command_line) => formatter.write_str(command_line),
        }
    }
}

/// `cmd` does not understand the `\"` escapes of the standard argument
/// quoting, so the line is passed on verbatim.
#[cfg(windows)]
fn append_shell_line(command: &mut Command, command_line: &str) {
    use std::os::windows::process::CommandExt;

    command.raw_arg(command_line);
}

#[cfg(not(windows))]
fn append_shell_line(command: &mut Command, command_line: &str) {
    command.arg(command_line);
}

/// Checks whether `program` can be found in one of the `PATH` directories.
pub fn program_on_path(program: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&paths).any(|directory| is_program_in(&directory, program))
}

fn is_program_in(directory: &Path, program: &str) -> bool {
    if directory.join(program).is_file() {
        return true;
    }

    cfg!(windows) && directory.join(format!("{program}.exe")).is_file()
}

//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure and turns the
//! chosen action into the [`Message`]s that drive the application.

use clap::{Parser, Subcommand};
use uvgui_core::dispatcher::AddRequest;
use uvgui_core::error::{Error, Result};
use uvgui_core::runner::Runner;

use crate::app::{Message, UvGui};

/// Command-line arguments for the `uvg` front-end.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use uvgui_cli::cli_args::Args;
///
/// let args = Args::parse_from(["uvg", "--project", "/work/demo", "add", "numpy", "-U"]);
/// assert_eq!(args.project.as_deref(), Some("/work/demo"));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "uvg", version, about = "A front-end for the uv Python package manager")]
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// The project directory to work in.
    #[arg(long, short = 'p', global = true)]
    pub project: Option<String>,

    /// Path to the settings YAML.
    ///
    /// If not provided, defaults to `~/.uvgui/settings.yml`.
    #[arg(long, short = 'c', global = true)]
    pub config_path: Option<String>,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Install uv with the official install script.
    Install,

    /// Upgrade uv to its latest release.
    Upgrade,

    /// Initialise the project with `uv init`.
    Init {
        /// Python version for the new project, e.g. `3.12`.
        #[arg(long)]
        python: Option<String>,
    },

    /// Add dependencies to the project.
    Add {
        /// Dependencies as accepted by `uv add`, e.g. `numpy` or `pytest>=7.0`.
        #[arg(required = true)]
        dependencies: Vec<String>,

        /// Upgrade the dependencies that are already locked.
        #[arg(long, short = 'U', action)]
        upgrade: bool,

        /// Ask `uv` for verbose output.
        #[arg(long, short = 'v', action)]
        verbose: bool,

        /// Package index URL to resolve against.
        #[arg(long, short = 'i', conflicts_with = "mirror")]
        index_url: Option<String>,

        /// Index of a configured mirror, see `uvg mirrors`.
        #[arg(long, short = 'm')]
        mirror: Option<usize>,
    },

    /// Remove a dependency.
    ///
    /// Takes either the dependency entry (e.g. `pytest>=7.0`) or its index as
    /// listed by `uvg deps`.
    Remove { entry: String },

    /// List the project dependencies.
    Deps,

    /// List the configured package index mirrors.
    Mirrors,
}

impl Action {
    /// The messages to send to `app` for this action.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency or mirror index is out of range.
    pub fn messages<R: Runner>(&self, app: &UvGui<R>) -> Result<Vec<Message>> {
        Ok(match self {
            Self::Install => vec![Message::InstallUv],
            Self::Upgrade => vec![Message::UpgradeUv],
            Self::Init { python } => python
                .iter()
                .map(|version| Message::SetPythonVersion(version.clone()))
                .chain([Message::InitProject])
                .collect(),
            Self::Add {
                dependencies,
                upgrade,
                verbose,
                index_url,
                mirror,
            } => {
                let index_url = match mirror {
                    Some(mirror) => Some(
                        app.settings()
                            .index_urls
                            .get(*mirror)
                            .cloned()
                            .ok_or(Error::MirrorIndex(*mirror))?,
                    ),
                    None => index_url.clone(),
                };

                vec![Message::AddDependencies(AddRequest {
                    dependencies: dependencies.clone(),
                    upgrade: *upgrade,
                    verbose: *verbose,
                    index_url,
                })]
            }
            Self::Remove { entry } => {
                let entry = match entry.parse::<usize>() {
                    Ok(index) if app.project.is_selected() => app
                        .dependencies
                        .get(index)
                        .cloned()
                        .ok_or(Error::DependencyIndex(index))?,
                    _ => entry.clone(),
                };
                vec![Message::RemoveDependency(Some(entry))]
            }
            // Selecting the project already refreshed the list.
            Self::Deps if app.project.is_selected() => Vec::new(),
            Self::Deps => vec![Message::RefreshDependencies],
            Self::Mirrors => Vec::new(),
        })
    }
}

//! The currently selected project.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};

/// Name of the virtual environment directory `uv` creates inside a project
pub const VENV_DIRECTORY: &str = ".venv";

/// Name of the project descriptor file
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Location of the descriptor inside `project_dir`.
pub fn pyproject_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PYPROJECT_FILE)
}

/// A selected project directory and the paths derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProject {
    directory: PathBuf,
    venv: PathBuf,
}

impl SelectedProject {
    fn new(directory: PathBuf) -> Self {
        let venv = directory.join(VENV_DIRECTORY);
        Self { directory, venv }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn venv_path(&self) -> &Path {
        &self.venv
    }

    pub fn pyproject_path(&self) -> PathBuf {
        pyproject_path(&self.directory)
    }
}

/// Holds the active project, if any.
///
/// A selection replaces the previous one as a whole. The directory is not
/// validated; any path is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    selected: Option<SelectedProject>,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, directory: impl Into<PathBuf>) -> &SelectedProject {
        let project = SelectedProject::new(directory.into());
        info!(
            "Selected project `{}` (venv `{}`)",
            project.directory.display(),
            project.venv.display()
        );
        self.selected.insert(project)
    }

    pub fn selected(&self) -> Option<&SelectedProject> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    /// Returns the selected project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoProjectSelected`] before the first selection.
    pub fn require(&self) -> Result<&SelectedProject> {
        self.selected.as_ref().ok_or(Error::NoProjectSelected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_selected_initially() {
        let state = ProjectState::new();
        assert!(!state.is_selected());
        assert!(state.selected().is_none());
        assert!(matches!(state.require(), Err(Error::NoProjectSelected)));
    }

    #[test]
    fn test_select_derives_venv_path() {
        let mut state = ProjectState::new();
        let project = state.select("/work/demo");
        assert_eq!(project.directory(), Path::new("/work/demo"));
        assert_eq!(project.venv_path(), Path::new("/work/demo/.venv"));
        assert_eq!(
            project.pyproject_path(),
            PathBuf::from("/work/demo/pyproject.toml")
        );
    }

    #[test]
    fn test_pyproject_path_matches_selection() {
        let mut state = ProjectState::new();
        let project = state.select("/work/demo");
        assert_eq!(
            project.pyproject_path(),
            pyproject_path(Path::new("/work/demo"))
        );
    }

    #[test]
    fn test_select_overwrites_previous_selection() {
        let mut state = ProjectState::new();
        state.select("/work/first");
        state.select("/work/second");

        let project = state.require().unwrap();
        assert_eq!(project.directory(), Path::new("/work/second"));
        assert_eq!(project.venv_path(), Path::new("/work/second/.venv"));
    }
}

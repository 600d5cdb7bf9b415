//! Reading the dependency list and python requirement from `pyproject.toml`.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::project::pyproject_path;

/// Python version reported when the descriptor does not declare one
pub const DEFAULT_PYTHON_VERSION: &str = "3.8";

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct PyProject {
    pub project: Option<ProjectTable>,
}

/// The `[project]` table. Only the fields uvgui looks at are read.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectTable {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(rename = "requires-python")]
    pub requires_python: Option<String>,
}

/// Reads `<project_dir>/pyproject.toml`.
///
/// Returns `None` if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not valid TOML
/// of the expected shape.
pub fn read_pyproject(project_dir: &Path) -> Result<Option<PyProject>> {
    let path = pyproject_path(project_dir);
    if !path.exists() {
        debug!("No descriptor at `{}`", path.display());
        return Ok(None);
    }

    let raw = fs::read_to_string(&path).map_err(|e| {
        Error::io_error("project descriptor".to_string(), path.display().to_string(), e)
    })?;

    toml::from_str(&raw)
        .map(Some)
        .map_err(|e| Error::descriptor_error(path.display().to_string(), e))
}

/// Lists the declared dependencies of the project, as written.
///
/// An absent descriptor, `[project]` table or `dependencies` key all give an
/// empty list.
///
/// # Errors
///
/// See [`read_pyproject`].
pub fn read_dependencies(project_dir: &Path) -> Result<Vec<String>> {
    Ok(read_pyproject(project_dir)?
        .and_then(|pyproject| pyproject.project)
        .map(|project| project.dependencies)
        .unwrap_or_default())
}

/// Reads the minimum python version from `requires-python`.
///
/// Falls back to [`DEFAULT_PYTHON_VERSION`] when nothing is declared.
///
/// # Errors
///
/// See [`read_pyproject`].
pub fn read_python_version(project_dir: &Path) -> Result<String> {
    let requirement = read_pyproject(project_dir)?
        .and_then(|pyproject| pyproject.project)
        .and_then(|project| project.requires_python);

    Ok(requirement.map_or_else(
        || DEFAULT_PYTHON_VERSION.to_string(),
        |requirement| python_version_from_requirement(&requirement),
    ))
}

/// Reduces a requirement such as `>=3.10` to the bare version `3.10`.
///
/// The version is the text after the first `=`, cut at the first `,` or
/// whitespace. Without any `=` the leading operator characters are dropped.
pub fn python_version_from_requirement(requirement: &str) -> String {
    let tail = match requirement.split_once('=') {
        Some((_, tail)) => tail.trim_start_matches(['=', ' ']),
        None => requirement.trim_start_matches(['<', '>', '~', '!', '^', ' ']),
    };

    let version = tail
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    if version.is_empty() {
        DEFAULT_PYTHON_VERSION.to_string()
    } else {
        version.to_string()
    }
}

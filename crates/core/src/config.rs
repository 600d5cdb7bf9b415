//! Settings and path utilities for uvgui.
//!
//! This module provides the [`Settings`] structure read from the settings file,
//! functions for resolving the settings path, and expansion of shell variables
//! like `~` in user supplied project paths.

use std::path::PathBuf;

use serde::Deserialize;

/// Default path for the settings file
const DEFAULT_SETTINGS_PATH: &str = "~/.uvgui/settings.yml";

/// Program used for every `uv` invocation unless configured otherwise
pub const DEFAULT_UV_BINARY: &str = "uv";

/// Shell used for commands that are a single command line
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";

/// Flag passing a command line to [`DEFAULT_SHELL`]
#[cfg(not(windows))]
pub const SHELL_COMMAND_FLAG: &str = "-c";
#[cfg(windows)]
pub const SHELL_COMMAND_FLAG: &str = "/C";

const DEFAULT_INDEX_URLS: [&str; 7] = [
    "https://pypi.tuna.tsinghua.edu.cn/simple",
    "https://pypi.mirrors.ustc.edu.cn/simple",
    "https://pypi.douban.com/simple/",
    "https://mirrors.aliyun.com/pypi/simple/",
    "https://download.pytorch.org/whl/cpu",
    "https://download.pytorch.org/whl/cu118",
    "https://download.pytorch.org/whl/cu121",
];

/// User settings, loaded from YAML.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Program name or path of the `uv` executable.
    pub uv_binary: String,
    /// Python versions offered for `uv init`.
    pub python_versions: Vec<String>,
    /// Package index mirrors offered when adding dependencies.
    pub index_urls: Vec<String>,
}

impl Settings {
    /// Whether `version` is one of the offered python versions.
    ///
    /// An empty list accepts any version.
    pub fn offers_python_version(&self, version: &str) -> bool {
        self.python_versions.is_empty() || self.python_versions.iter().any(|v| v == version)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            uv_binary: DEFAULT_UV_BINARY.to_string(),
            python_versions: (7..=13).map(|minor| format!("3.{minor}")).collect(),
            index_urls: DEFAULT_INDEX_URLS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use uvgui_core::config::get_settings_path;
///
/// // Use default path
/// let default_path = get_settings_path(&None);
///
/// // Use custom path
/// let custom_path = get_settings_path(&Some("/path/to/settings.yml".to_string()));
/// ```
pub fn get_settings_path(settings_path_arg: &Option<String>) -> String {
    let settings_path = match settings_path_arg {
        Some(settings_path) => settings_path,
        None => DEFAULT_SETTINGS_PATH,
    };

    shellexpand::tilde(settings_path).to_string()
}

/// Expands shell variables like `~` in a project directory given by the user.
///
/// # Examples
///
/// ```
/// use uvgui_core::config::expand_project_directory;
///
/// let expanded = expand_project_directory("~/projects/demo");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_project_directory(project_directory: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(project_directory).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_settings_path_with_custom_path() {
        let custom_path = Some("/custom/path/settings.yml".to_string());
        let result = get_settings_path(&custom_path);
        assert_eq!(result, "/custom/path/settings.yml");
    }

    #[test]
    fn test_get_settings_path_with_none() {
        let result = get_settings_path(&None);
        // Should expand the tilde in the default path
        assert!(result.ends_with("settings.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_expand_project_directory_without_tilde() {
        let result = expand_project_directory("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_project_directory_with_tilde() {
        let result = expand_project_directory("~/projects/demo");
        assert!(!result.starts_with("~"));
        assert!(result.ends_with("projects/demo"));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.uv_binary, "uv");
        assert_eq!(settings.python_versions.first().unwrap(), "3.7");
        assert_eq!(settings.python_versions.last().unwrap(), "3.13");
        assert_eq!(settings.index_urls.len(), 7);
    }

    #[test]
    fn test_offers_python_version() {
        let settings = Settings::default();
        assert!(settings.offers_python_version("3.10"));
        assert!(!settings.offers_python_version("2.7"));

        let open = Settings {
            python_versions: Vec::new(),
            ..Settings::default()
        };
        assert!(open.offers_python_version("2.7"));
    }
}

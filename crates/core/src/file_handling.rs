//! File handling for uvgui settings.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::config::Settings;
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

/// Loads the settings file.
///
/// A missing file is not an error: the defaults are returned instead.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid YAML
/// - The YAML doesn't match the expected structure
///
/// # Examples
///
/// ```no_run
/// use uvgui_core::file_handling::get_settings;
///
/// let settings = get_settings("~/.uvgui/settings.yml")?;
/// println!("Using `{}`", settings.uv_binary);
/// # Ok::<(), uvgui_core::error::Error>(())
/// ```
pub fn get_settings(settings_path: &str) -> Result<Settings> {
    if !Path::new(settings_path).exists() {
        debug!("No settings at `{settings_path}`, using defaults");
        return Ok(Settings::default());
    }

    let mut raw = String::new();
    get_reader("settings", settings_path)?
        .read_to_string(&mut raw)
        .map_err(|e| Error::io_error("settings".to_string(), settings_path.to_string(), e))?;

    // An empty file is treated like a missing one.
    if raw.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&raw).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "settings".to_string(),
            settings_path.to_string(),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{content}").unwrap();
        temp_file
    }

    #[test]
    fn test_get_settings_file_not_exists() {
        let settings = get_settings("/this/path/does/not/exist.yml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_get_settings_partial_file_keeps_defaults() {
        let temp_file = write_temp("uv_binary: /opt/uv/bin/uv\n");
        let settings = get_settings(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(settings.uv_binary, "/opt/uv/bin/uv");
        assert_eq!(settings.python_versions, Settings::default().python_versions);
        assert_eq!(settings.index_urls, Settings::default().index_urls);
    }

    #[test]
    fn test_get_settings_full_file() {
        let yaml_content = r#"
uv_binary: uv
python_versions: ["3.11", "3.12"]
index_urls:
  - https://example.org/simple
"#;
        let temp_file = write_temp(yaml_content);
        let settings = get_settings(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(settings.python_versions, vec!["3.11", "3.12"]);
        assert_eq!(settings.index_urls, vec!["https://example.org/simple"]);
    }

    #[test]
    fn test_get_settings_empty_file() {
        let temp_file = write_temp("");
        let settings = get_settings(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_get_settings_invalid_yaml() {
        let temp_file = write_temp("uv_binary: [unclosed");
        let result = get_settings(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }
}

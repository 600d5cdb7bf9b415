use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not launch `{}`: {}", .command, .original)]
    Launch {
        command: String,
        original: std::io::Error,
    },

    #[error("No command to execute.")]
    EmptyCommand,

    #[error("Please select a project first!")]
    NoProjectSelected,

    #[error("No dependencies were given to add.")]
    NoDependencies,

    #[error("Could not find a package name in dependency entry `{}`", .0)]
    InvalidDependencyEntry(String),

    #[error("unsupported system: {}", .0)]
    UnsupportedPlatform(String),

    #[error("Error reading project descriptor at `{}`: {}", .path, .original)]
    Descriptor {
        path: String,
        original: toml::de::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("Dependency index out of range: {}", .0)]
    DependencyIndex(usize),

    #[error("Index URL mirror index out of range: {}", .0)]
    MirrorIndex(usize),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn launch_error(command: String, original: std::io::Error) -> Self {
        Self::Launch { command, original }
    }

    pub fn descriptor_error(path: String, original: toml::de::Error) -> Self {
        Self::Descriptor { path, original }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}

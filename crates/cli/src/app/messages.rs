use std::path::PathBuf;

use uvgui_core::dispatcher::AddRequest;
use uvgui_core::runner::RunEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    SelectProject(PathBuf),
    SetPythonVersion(String),
    InstallUv,
    UpgradeUv,
    InitProject,
    AddDependencies(AddRequest),
    /// The dependency entry to remove, if one is selected.
    RemoveDependency(Option<String>),
    RefreshDependencies,
    Run(RunEvent),
}

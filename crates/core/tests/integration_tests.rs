//! Integration tests for uvgui-core
//!
//! These tests verify that the core functionality works together correctly
//! by testing complete workflows end-to-end.

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use uvgui_core::{
    command_spec::CommandSpec,
    config::Settings,
    dispatcher::{AddRequest, AfterRun, CommandDispatcher},
    error::Error,
    file_handling::get_settings,
    project::ProjectState,
    pyproject::{read_dependencies, read_pyproject, read_python_version},
    runner::{ProcessRunner, RunEvent, RunEventKind, RunId, Runner},
};

fn write_pyproject(directory: &Path, content: &str) {
    fs::write(directory.join("pyproject.toml"), content).unwrap();
}

fn drain_run(receiver: &Receiver<RunEvent>, run: RunId) -> (Vec<String>, usize) {
    let mut lines = Vec::new();
    let mut completions = 0;
    while let Ok(event) = receiver.recv_timeout(Duration::from_secs(10)) {
        assert_eq!(event.run, run);
        match event.kind {
            RunEventKind::Output(line) => {
                assert_eq!(completions, 0, "output after completion");
                lines.push(line);
            }
            RunEventKind::Completed => {
                completions += 1;
                // Give a duplicate completion a chance to show up.
                if receiver.recv_timeout(Duration::from_millis(200)).is_ok() {
                    completions += 1;
                }
                break;
            }
        }
    }
    (lines, completions)
}

/// Test the descriptor defaults for a directory without `pyproject.toml`
#[test]
fn test_absent_descriptor_defaults() {
    let project = tempfile::tempdir().unwrap();

    assert!(read_pyproject(project.path()).unwrap().is_none());
    assert!(read_dependencies(project.path()).unwrap().is_empty());
    assert_eq!(read_python_version(project.path()).unwrap(), "3.8");
}

/// Test reading a typical descriptor written by `uv init`
#[test]
fn test_descriptor_with_dependencies_and_python() {
    let project = tempfile::tempdir().unwrap();
    write_pyproject(
        project.path(),
        r#"
[project]
name = "demo"
version = "0.1.0"
requires-python = ">=3.10"
dependencies = ["flask", "pytest>=7.0"]

[tool.uv]
dev-dependencies = []
"#,
    );

    assert_eq!(
        read_dependencies(project.path()).unwrap(),
        vec!["flask", "pytest>=7.0"]
    );
    assert_eq!(read_python_version(project.path()).unwrap(), "3.10");
}

/// Test a descriptor without the fields uvgui reads
#[test]
fn test_descriptor_without_project_table() {
    let project = tempfile::tempdir().unwrap();
    write_pyproject(project.path(), "[tool.black]\nline-length = 100\n");

    assert!(read_dependencies(project.path()).unwrap().is_empty());
    assert_eq!(read_python_version(project.path()).unwrap(), "3.8");

    write_pyproject(project.path(), "[project]\nname = \"demo\"\n");
    assert!(read_dependencies(project.path()).unwrap().is_empty());
    assert_eq!(read_python_version(project.path()).unwrap(), "3.8");
}

/// Test that a malformed descriptor is reported, not defaulted
#[test]
fn test_malformed_descriptor() {
    let project = tempfile::tempdir().unwrap();
    write_pyproject(project.path(), "[project\ndependencies = [");

    assert!(matches!(
        read_dependencies(project.path()),
        Err(Error::Descriptor { .. })
    ));
    assert!(matches!(
        read_python_version(project.path()),
        Err(Error::Descriptor { .. })
    ));
}

/// Test the selection, dispatch and follow-up of a remove
#[test]
fn test_remove_selected_dependency_workflow() {
    let project_dir = tempfile::tempdir().unwrap();
    write_pyproject(
        project_dir.path(),
        "[project]\ndependencies = [\"flask\", \"pytest>=7.0\"]\n",
    );

    let mut project = ProjectState::new();
    project.select(project_dir.path());

    let dependencies = read_dependencies(project_dir.path()).unwrap();
    let dispatch = CommandDispatcher::default()
        .remove(&project, &dependencies[1])
        .unwrap();

    assert_eq!(
        dispatch.spec.arguments().unwrap(),
        &["uv".to_string(), "remove".to_string(), "pytest".to_string()]
    );
    assert_eq!(
        dispatch.spec.working_directory.as_deref(),
        Some(project_dir.path())
    );
    assert_eq!(dispatch.after, AfterRun::RefreshDependencies);
}

/// Test that settings drive the dispatched binary
#[test]
fn test_settings_select_uv_binary() {
    let directory = tempfile::tempdir().unwrap();
    let settings_path = directory.path().join("settings.yml");
    fs::write(&settings_path, "uv_binary: /opt/uv/bin/uv\n").unwrap();

    let settings = get_settings(settings_path.to_str().unwrap()).unwrap();
    assert_eq!(settings.python_versions, Settings::default().python_versions);

    let dispatch = CommandDispatcher::new(settings.uv_binary).upgrade();
    assert_eq!(dispatch.spec.to_string(), "/opt/uv/bin/uv self update");
}

/// Test running a dispatched project command with a stand-in `uv`
#[cfg(unix)]
#[test]
fn test_dispatched_command_runs_in_project() {
    let project_dir = tempfile::tempdir().unwrap();
    let mut project = ProjectState::new();
    project.select(project_dir.path());

    // `echo` stands in for `uv` and prints the arguments it was given.
    let request = AddRequest {
        upgrade: true,
        ..AddRequest::from_input("numpy")
    };
    let dispatch = CommandDispatcher::new("echo").add(&project, &request).unwrap();

    let (sender, receiver) = mpsc::channel();
    let handle = ProcessRunner.start(&dispatch.spec, &sender);
    let (lines, completions) = drain_run(&receiver, handle.id());

    assert_eq!(lines, vec!["add -U numpy"]);
    assert_eq!(completions, 1);
}

/// Test that the output of a run matches the line split of its merged stream
#[cfg(unix)]
#[test]
fn test_run_output_matches_merged_stream() {
    let script = "for i in 1 2 3 4 5; do echo \"line $i\"; echo \"warn $i\" 1>&2; done";
    let (sender, receiver) = mpsc::channel();
    let handle = ProcessRunner.start(&CommandSpec::shell(script), &sender);

    let (lines, completions) = drain_run(&receiver, handle.id());
    let expected: Vec<String> = (1..=5)
        .flat_map(|i| [format!("line {i}"), format!("warn {i}")])
        .collect();

    assert_eq!(lines, expected);
    assert_eq!(completions, 1);
}

/// Test that a missing `uv` yields one line and one completion
#[test]
fn test_missing_uv_binary_completes() {
    let dispatch = CommandDispatcher::new("uvgui-missing-uv-binary").upgrade();

    let (sender, receiver) = mpsc::channel();
    let handle = ProcessRunner.start(&dispatch.spec, &sender);
    assert!(handle.is_finished());

    let (lines, completions) = drain_run(&receiver, handle.id());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("uvgui-missing-uv-binary self update"));
    assert_eq!(completions, 1);
}

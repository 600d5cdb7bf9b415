use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use itertools::Itertools;
use log::{debug, info, warn};
use uvgui_core::command_spec::{program_on_path, CommandSpec};
use uvgui_core::config::Settings;
use uvgui_core::dispatcher::{AfterRun, CommandDispatcher, Dispatch, InstallPlan, Platform};
use uvgui_core::error::{Error, Result};
use uvgui_core::project::ProjectState;
use uvgui_core::pyproject::{read_dependencies, read_python_version, DEFAULT_PYTHON_VERSION};
use uvgui_core::runner::{report_launch_failure, RunEvent, RunEventKind, RunHandle, RunId, Runner};

use crate::app::Message;

/// Printed to the output before every launched command
pub const RUN_START_PREFIX: &str = "run command start: ";

pub const SELECT_DEPENDENCY_WARNING: &str = "Please select a dependency to remove!";

/// The front-end state: selected project, dependency list, python version box,
/// output panel and the runs in flight.
///
/// Run events are only applied through [`UvGui::update`] on the thread that
/// owns the state. Workers send them over a channel.
pub struct UvGui<R: Runner> {
    runner: R,
    dispatcher: CommandDispatcher,
    settings: Settings,
    platform: Platform,
    has_program: fn(&str) -> bool,
    pub project: ProjectState,
    pub dependencies: Vec<String>,
    pub python_version: String,
    pub output: Vec<String>,
    pub warnings: Vec<String>,
    current_run: Option<RunHandle>,
    follow_ups: HashMap<RunId, AfterRun>,
    events: Sender<RunEvent>,
    incoming: Receiver<RunEvent>,
}

impl<R: Runner> UvGui<R> {
    pub fn new(runner: R, settings: Settings) -> Self {
        let (events, incoming) = mpsc::channel();
        Self {
            runner,
            dispatcher: CommandDispatcher::new(settings.uv_binary.clone()),
            settings,
            platform: Platform::current(),
            has_program: program_on_path,
            project: ProjectState::new(),
            dependencies: Vec::new(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            output: Vec::new(),
            warnings: Vec::new(),
            current_run: None,
            follow_ups: HashMap::new(),
            events,
            incoming,
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_program_probe(mut self, has_program: fn(&str) -> bool) -> Self {
        self.has_program = has_program;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The most recently started run. Earlier runs may still be going.
    pub fn current_run(&self) -> Option<&RunHandle> {
        self.current_run.as_ref()
    }

    /// True when every started run has delivered its completion.
    pub fn is_idle(&self) -> bool {
        self.follow_ups.is_empty()
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::SelectProject(directory) => self.select_project(directory),
            Message::SetPythonVersion(version) => {
                if self.settings.offers_python_version(&version) {
                    self.python_version = version;
                } else {
                    self.warnings.push(format!("Unknown python version: {version}"));
                }
            }
            Message::InstallUv => {
                match self.dispatcher.install_plan(&self.platform, self.has_program) {
                    Ok(plan) => self.install(plan),
                    Err(e) => self.report(e),
                }
            }
            Message::UpgradeUv => {
                let dispatch = self.dispatcher.upgrade();
                self.run(dispatch);
            }
            Message::InitProject => {
                let dispatch = self.dispatcher.init(&self.project, &self.python_version);
                self.run_or_report(dispatch);
            }
            Message::AddDependencies(request) => {
                let dispatch = self.dispatcher.add(&self.project, &request);
                self.run_or_report(dispatch);
            }
            Message::RemoveDependency(Some(entry)) => {
                let dispatch = self.dispatcher.remove(&self.project, &entry);
                self.run_or_report(dispatch);
            }
            Message::RemoveDependency(None) => {
                if let Err(e) = self.project.require() {
                    self.report(e);
                } else {
                    self.warnings.push(SELECT_DEPENDENCY_WARNING.to_string());
                }
            }
            Message::RefreshDependencies => self.refresh_dependencies(),
            Message::Run(event) => self.apply_run_event(event),
        }
    }

    /// Applies every run event that has already arrived. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.incoming.try_recv() {
            self.update(Message::Run(event));
            applied += 1;
        }
        applied
    }

    /// Blocks until the next run event arrives and applies it.
    ///
    /// Returns `false` without blocking when no run is pending.
    pub fn wait_for_event(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }

        match self.incoming.recv() {
            Ok(event) => {
                self.update(Message::Run(event));
                true
            }
            // We hold a sender ourselves, so this cannot happen.
            Err(_) => false,
        }
    }

    fn select_project(&mut self, directory: PathBuf) {
        let directory = self.project.select(directory).directory().to_path_buf();

        match read_python_version(&directory) {
            Ok(version) if self.settings.offers_python_version(&version) => {
                self.python_version = version;
            }
            Ok(version) => debug!(
                "Python version `{version}` is not offered, keeping {}",
                self.python_version
            ),
            Err(e) => self.output.push(format!("Error reading python version: {e}")),
        }

        self.refresh_dependencies();
    }

    /// Re-reads the dependency list. The old list stays when reading fails.
    fn refresh_dependencies(&mut self) {
        let Some(project) = self.project.selected() else {
            self.report(Error::NoProjectSelected);
            return;
        };

        match read_dependencies(project.directory()) {
            Ok(dependencies) => {
                self.dependencies = dependencies;
                self.output.push("refreshing dependencies: ok".to_string());
            }
            Err(e) => {
                warn!(
                    "Refreshing dependencies from `{}` failed: {e}",
                    project.pyproject_path().display()
                );
                self.output.push(format!("Error refreshing dependencies: {e}"));
            }
        }
    }

    fn install(&mut self, plan: InstallPlan) {
        self.announce(&plan.primary);

        match self.runner.try_start(&plan.primary, &self.events) {
            Ok(handle) => self.track(handle, AfterRun::Nothing),
            Err(e) => match plan.fallback {
                Some(fallback) => {
                    warn!("{e}, trying `{fallback}` instead");
                    self.run(Dispatch {
                        spec: fallback,
                        after: AfterRun::Nothing,
                    });
                }
                None => {
                    let handle = report_launch_failure(&self.events, &e);
                    self.track(handle, AfterRun::Nothing);
                }
            },
        }
    }

    fn run_or_report(&mut self, dispatch: Result<Dispatch>) {
        match dispatch {
            Ok(dispatch) => self.run(dispatch),
            Err(e) => self.report(e),
        }
    }

    fn run(&mut self, dispatch: Dispatch) {
        self.announce(&dispatch.spec);
        let handle = self.runner.start(&dispatch.spec, &self.events);
        self.track(handle, dispatch.after);
    }

    fn announce(&mut self, spec: &CommandSpec) {
        info!("Running `{spec}`");
        for (key, value) in spec.environment.iter().sorted() {
            debug!("With environment \"{key}\": \"{value}\"");
        }
        self.output.push(format!("{RUN_START_PREFIX}{spec}"));
    }

    fn track(&mut self, handle: RunHandle, after: AfterRun) {
        let _ = self.follow_ups.insert(handle.id(), after);

        if let Some(previous) = self.current_run.replace(handle) {
            if !previous.is_finished() {
                debug!("Run {} is still going, no longer current", previous.id());
            }
        }
    }

    fn apply_run_event(&mut self, event: RunEvent) {
        match event.kind {
            RunEventKind::Output(line) => self.output.push(line),
            RunEventKind::Completed => {
                if self
                    .current_run
                    .as_ref()
                    .is_some_and(|handle| handle.id() == event.run)
                {
                    self.current_run = None;
                }

                match self.follow_ups.remove(&event.run) {
                    Some(AfterRun::RefreshDependencies) => self.refresh_dependencies(),
                    Some(AfterRun::Nothing) => {}
                    None => debug!("Completion for unknown run {}", event.run),
                }
            }
        }
    }

    /// Turns an error into text for the user: a warning for things the user
    /// has to fix first, an output line otherwise.
    fn report(&mut self, error: Error) {
        match error {
            Error::NoProjectSelected
            | Error::NoDependencies
            | Error::InvalidDependencyEntry(_) => {
                warn!("{error}");
                self.warnings.push(error.to_string());
            }
            _ => self.output.push(error.to_string()),
        }
    }
}

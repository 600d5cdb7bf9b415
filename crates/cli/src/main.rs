use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use log::debug;
use uvgui_cli::app::{Message, UvGui};
use uvgui_cli::cli_args::{Action, Args};
use uvgui_cli::ui::{render_numbered, TerminalPanel};
use uvgui_core::config;
use uvgui_core::error::Result;
use uvgui_core::file_handling;
use uvgui_core::runner::ProcessRunner;

/// Runs the requested action to completion. Returns whether it went without
/// warnings.
fn execute() -> Result<bool> {
    let args = Args::parse();
    let mut stdout = stdout();

    let settings_path = config::get_settings_path(&args.config_path);
    debug!("Settings path: `{settings_path}`");
    let settings = file_handling::get_settings(&settings_path)?;

    if args.action == Action::Mirrors {
        render_numbered("Index URLs:", &settings.index_urls, &mut stdout)?;
        return Ok(true);
    }

    let mut app = UvGui::new(ProcessRunner, settings);
    let mut panel = TerminalPanel::default();

    if let Some(project) = &args.project {
        app.update(Message::SelectProject(config::expand_project_directory(
            project,
        )));
    }

    for message in args.action.messages(&app)? {
        app.update(message);
    }
    panel.render(&app, &mut stdout)?;

    while app.wait_for_event() {
        app.pump();
        panel.render(&app, &mut stdout)?;
    }

    if args.action == Action::Deps && app.project.is_selected() {
        render_numbered("Dependencies:", &app.dependencies, &mut stdout)?;
    }

    Ok(app.warnings.is_empty())
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

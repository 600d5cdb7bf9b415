//! uvgui Core Library
//!
//! This crate provides the core functionality of uvgui, a front-end for the
//! `uv` Python package manager. It plans `uv` invocations for user intents and
//! runs them in the background, streaming their output line by line.
//!
//! # Key Features
//!
//! - **Process Runner**: Launch commands off the caller's thread with merged, streamed output
//! - **Command Dispatcher**: Map install, upgrade, init, add and remove to concrete commands
//! - **Project State**: Track the selected project and its virtual environment
//! - **Project Descriptor**: Read dependencies and the python requirement from `pyproject.toml`
//! - **Settings**: Configure the `uv` binary, python versions and index mirrors
//! - **Error Handling**: Comprehensive error types for all failure modes
//!
//! # Examples
//!
//! Running `uv add` in a project and printing its output as it arrives:
//!
//! ```no_run
//! use std::sync::mpsc;
//!
//! use uvgui_core::dispatcher::{AddRequest, CommandDispatcher};
//! use uvgui_core::project::ProjectState;
//! use uvgui_core::runner::{ProcessRunner, RunEventKind, Runner};
//!
//! let mut project = ProjectState::new();
//! project.select("/work/demo");
//!
//! let dispatch = CommandDispatcher::default().add(&project, &AddRequest::from_input("numpy"))?;
//! let (sender, receiver) = mpsc::channel();
//! let _handle = ProcessRunner.start(&dispatch.spec, &sender);
//!
//! for event in receiver {
//!     match event.kind {
//!         RunEventKind::Output(line) => println!("{line}"),
//!         RunEventKind::Completed => break,
//!     }
//! }
//! # Ok::<(), uvgui_core::error::Error>(())
//! ```

pub mod command_spec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod file_handling;
pub mod project;
pub mod pyproject;
pub mod runner;

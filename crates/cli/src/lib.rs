//! uvgui CLI Library
//!
//! This crate provides the terminal front-end of uvgui. It holds the
//! application state a graphical front-end would hold (selected project,
//! dependency list, python version, output panel), feeds it messages for the
//! requested action, and prints the output of `uv` as it streams in.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and translation into messages
//! - [`app`]: The application state and its message handling
//! - [`ui`]: Incremental terminal rendering of output and warnings
//!
//! # Examples
//!
//! The binary (`uvg`) can be used in several ways:
//!
//! ```bash
//! # Install or upgrade uv itself
//! uvg install
//! uvg upgrade
//!
//! # Initialise a project for a python version
//! uvg -p ~/work/demo init --python 3.12
//!
//! # Add dependencies, upgrading locked versions, from a configured mirror
//! uvg -p ~/work/demo add numpy "pandas>=2" -U -m 1
//!
//! # List dependencies and remove one by its index
//! uvg -p ~/work/demo deps
//! uvg -p ~/work/demo remove 1
//! ```

pub mod app;
pub mod cli_args;
pub mod ui;

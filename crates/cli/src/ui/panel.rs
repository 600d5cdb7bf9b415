use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use uvgui_core::runner::Runner;

use crate::app::{UvGui, RUN_START_PREFIX};

/// Prints the output panel and warnings of a [`UvGui`] incrementally.
///
/// Every call to [`TerminalPanel::render`] prints only what was added since
/// the previous call.
#[derive(Debug, Default)]
pub struct TerminalPanel {
    printed_output: usize,
    printed_warnings: usize,
}

impl TerminalPanel {
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn render<R: Runner, W: Write>(&mut self, app: &UvGui<R>, out: &mut W) -> io::Result<()> {
        for line in app.output.iter().skip(self.printed_output) {
            if line.starts_with(RUN_START_PREFIX) {
                queue!(out, PrintStyledContent(line.as_str().dark_grey()), Print("\n"))?;
            } else {
                queue!(out, Print(line), Print("\n"))?;
            }
        }
        self.printed_output = app.output.len();

        for warning in app.warnings.iter().skip(self.printed_warnings) {
            queue!(
                out,
                PrintStyledContent("Warning: ".yellow().bold()),
                PrintStyledContent(warning.as_str().yellow()),
                Print("\n")
            )?;
        }
        self.printed_warnings = app.warnings.len();

        out.flush()
    }
}

/// Prints a numbered list, one entry per line, under `title`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_numbered<W: Write>(title: &str, entries: &[String], out: &mut W) -> io::Result<()> {
    queue!(out, PrintStyledContent(title.bold()), Print("\n"))?;

    if entries.is_empty() {
        queue!(out, PrintStyledContent("  (none)".dark_grey()), Print("\n"))?;
    }

    for (index, entry) in entries.iter().enumerate() {
        queue!(
            out,
            PrintStyledContent(format!("  [{index}] ").cyan()),
            Print(entry),
            Print("\n")
        )?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numbered_lists_entries_with_index() {
        let mut out = Vec::new();
        let entries = vec!["flask".to_string(), "pytest>=7.0".to_string()];
        render_numbered("Dependencies:", &entries, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Dependencies:"));
        assert!(text.contains("[0] "));
        assert!(text.contains("flask"));
        assert!(text.contains("[1] "));
        assert!(text.contains("pytest>=7.0"));
    }

    #[test]
    fn test_render_numbered_empty() {
        let mut out = Vec::new();
        render_numbered("Dependencies:", &[], &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("(none)"));
    }
}

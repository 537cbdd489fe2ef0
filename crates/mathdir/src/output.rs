//! Colored terminal output utilities.

use console::{Style, Term};

/// Message styling.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
}

/// Terminal output formatter.
///
/// Status messages go to stderr; command results go to stdout so they can
/// be piped into other tools.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    /// Write a command result line to stdout.
    pub(crate) fn result(&self, text: &str) -> std::io::Result<()> {
        self.results.write_line(text)
    }

    pub(crate) fn info(&self, msg: &str) {
        self.message(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.message(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.message(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.message(Tone::Error, msg);
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.message(Tone::Heading, msg);
    }

    fn message(&self, tone: Tone, msg: &str) {
        let style = match tone {
            Tone::Plain => Style::new(),
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red(),
            Tone::Heading => Style::new().cyan().bold(),
        };
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }
}

//! Colored terminal output on stderr.

use console::{Style, Term};

/// Width of separator lines.
const SEPARATOR_WIDTH: usize = 60;

/// Color of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Highlight,
}

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print a line in the given tone.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let styled = match tone {
            Tone::Plain => msg.to_owned(),
            Tone::Success => self.green.apply_to(msg).to_string(),
            Tone::Warning => self.yellow.apply_to(msg).to_string(),
            Tone::Error => self.red.apply_to(msg).to_string(),
            Tone::Highlight => self.cyan_bold.apply_to(msg).to_string(),
        };
        let _ = self.term.write_line(&styled);
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Error, msg);
    }

    /// Print a title framed by separator lines.
    pub(crate) fn banner(&self, title: &str) {
        self.separator();
        self.line(Tone::Highlight, title);
        self.separator();
    }

    /// Print an indented `label: value` pair with aligned values.
    pub(crate) fn field(&self, label: &str, value: &str) {
        self.info(&format!("  {:<9}{value}", format!("{label}:")));
    }

    pub(crate) fn separator(&self) {
        let _ = self.term.write_line(&"=".repeat(SEPARATOR_WIDTH));
    }
}

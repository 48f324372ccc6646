//! Terminal colouring for shell messages

use owo_colors::{colors::css, OwoColorize};

/// Detects whether colored output should be enabled
#[must_use]
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Extension trait for colorizing shell output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Bold heading
    fn heading(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn heading(&self) -> String {
        paint(self, |s| s.bold().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn heading(&self) -> String {
        self.as_str().heading()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

use std::fmt;

use ratatui::style::Color;

use crate::card::Mark;

/// Named colors shared by printed output and the review screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Accent,
    Info,
    Correct,
    Incorrect,
    Warning,
    Muted,
}

impl Tone {
    pub const fn color(self) -> Color {
        match self {
            Tone::Accent => Color::Blue,
            Tone::Info => Color::Cyan,
            Tone::Correct => Color::Green,
            Tone::Incorrect => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Muted => Color::Gray,
        }
    }

    /// SGR foreground code for plain terminal output.
    const fn sgr(self) -> u8 {
        match self {
            Tone::Accent => 34,
            Tone::Info => 36,
            Tone::Correct => 32,
            Tone::Incorrect => 31,
            Tone::Warning => 33,
            Tone::Muted => 90,
        }
    }

    pub fn paint(self, value: impl fmt::Display) -> String {
        format!("\x1b[{}m{}\x1b[0m", self.sgr(), value)
    }
}

impl From<Mark> for Tone {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Unmarked => Tone::Muted,
            Mark::Correct => Tone::Correct,
            Mark::Incorrect => Tone::Incorrect,
        }
    }
}

pub fn dim(value: impl fmt::Display) -> String {
    format!("\x1b[2m{}\x1b[0m", value)
}

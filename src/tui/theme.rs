use crate::card::Mark;
use crate::palette::Tone;

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType},
};

const SEPARATOR: &str = " • ";

/// A key binding shown in a footer, e.g. `[R] Right`.
#[derive(Debug, Clone)]
pub struct Hint {
    key: &'static str,
    action: String,
    tone: Option<Tone>,
    enabled: bool,
}

impl Hint {
    pub fn new(key: &'static str, action: impl Into<String>) -> Self {
        Self {
            key,
            action: action.into(),
            tone: None,
            enabled: true,
        }
    }

    /// Colors the action text.
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Disabled hints are greyed out.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn spans(self) -> [Span<'static>; 2] {
        let (chip_bg, action_style) = match (self.enabled, self.tone) {
            (false, _) => (Tone::Muted.color(), Theme::plain(Tone::Muted)),
            (true, Some(tone)) => (Tone::Accent.color(), Theme::bold(tone)),
            (true, None) => (Tone::Accent.color(), Style::default()),
        };
        let chip = Style::default()
            .fg(Theme::KEY_FG)
            .bg(chip_bg)
            .add_modifier(Modifier::BOLD);
        [
            Span::styled(format!(" {} ", self.key), chip),
            Span::styled(format!(" {}", self.action), action_style),
        ]
    }
}

/// Styles and frames shared by the review and creator screens.
pub struct Theme;

impl Theme {
    pub const KEY_FG: Color = Color::White;

    pub fn plain(tone: Tone) -> Style {
        Style::default().fg(tone.color())
    }

    pub fn bold(tone: Tone) -> Style {
        Self::plain(tone).add_modifier(Modifier::BOLD)
    }

    pub fn emphasis() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn mark(mark: Mark) -> Style {
        Self::bold(Tone::from(mark))
    }

    /// Transient status messages: green when saved, red on failure.
    pub fn status(is_error: bool) -> Style {
        Self::bold(if is_error {
            Tone::Incorrect
        } else {
            Tone::Correct
        })
    }

    pub fn frame<'a>(title: Line<'a>) -> Block<'a> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Self::plain(Tone::Muted))
            .title(title)
            .title_alignment(Alignment::Left)
    }

    pub fn titled<'a>(title: impl Into<String>) -> Block<'a> {
        Self::frame(Line::from(Span::styled(
            format!(" {} ", title.into()),
            Self::bold(Tone::Accent),
        )))
    }

    pub fn heading<'a>(title: impl Into<String>) -> Block<'a> {
        Self::frame(Line::from(Span::styled(title.into(), Self::emphasis())))
    }

    /// Joins spans into one line with a bullet between each.
    pub fn joined(spans: impl IntoIterator<Item = Span<'static>>) -> Line<'static> {
        let mut out = Vec::new();
        for span in spans {
            if !out.is_empty() {
                out.push(Span::raw(SEPARATOR));
            }
            out.push(span);
        }
        Line::from(out)
    }

    pub fn hints(hints: impl IntoIterator<Item = Hint>) -> Line<'static> {
        let mut out = Vec::new();
        for hint in hints {
            if !out.is_empty() {
                out.push(Span::raw(SEPARATOR));
            }
            out.extend(hint.spans());
        }
        Line::from(out)
    }
}

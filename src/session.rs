//! Review session state machine.
//!
//! A session walks a fixed list of flashcard files forever. Each side of the
//! current card is revealed one character per [`ReviewSession::tick`]; the
//! caller owns the clock and calls `tick` every [`ReviewSession::tick_interval`]
//! while [`ReviewSession::is_typing`] is true.
//!
//! ```text
//! Revealing(Question) -> Revealed(Question) -> Revealing(Answer) -> Revealed(Answer)
//!        ^                                                               |
//!        +--------------------- flip() or advance() ---------------------+
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::audio::{AudioSurface, Sound};
use crate::card::{Flashcard, Mark, Side};
use crate::parser::load_flashcard;
use crate::results::{Results, ResultsError, Tally};
use crate::selection::{Mode, Selector};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no flashcards to review")]
    NoFlashcardsFound,

    #[error(transparent)]
    Results(#[from] ResultsError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Revealing(Side),
    Revealed(Side),
}

impl Phase {
    pub fn side(self) -> Side {
        match self {
            Phase::Revealing(side) | Phase::Revealed(side) => side,
        }
    }
}

pub struct ReviewSession {
    selector: Selector,
    mode: Mode,
    card: Flashcard,
    phase: Phase,
    text: Vec<char>,
    visible: String,
    mark: Mark,
    settings: Settings,
    results: Results,
    results_path: PathBuf,
    audio: Box<dyn AudioSurface>,
}

impl ReviewSession {
    pub fn start(
        cards: Vec<PathBuf>,
        mode: Mode,
        settings: Settings,
        results: Results,
        results_path: PathBuf,
        audio: Box<dyn AudioSurface>,
    ) -> Result<Self, SessionError> {
        let selector = Selector::new(cards, mode.order()).ok_or(SessionError::NoFlashcardsFound)?;
        let card = load_flashcard(selector.current());
        tracing::info!(
            mode = mode.label(),
            cards = selector.cards().len(),
            typing_speed = settings.typing_speed,
            "review session started"
        );

        let mut session = Self {
            selector,
            mode,
            card,
            phase: Phase::Revealed(Side::Question),
            text: Vec::new(),
            visible: String::new(),
            mark: Mark::Unmarked,
            settings,
            results,
            results_path,
            audio,
        };
        session.begin_reveal(Side::Question);
        Ok(session)
    }

    pub fn current_path(&self) -> &Path {
        self.selector.current()
    }

    pub fn flashcard(&self) -> &Flashcard {
        &self.card
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn side(&self) -> Side {
        self.phase.side()
    }

    pub fn visible_text(&self) -> &str {
        &self.visible
    }

    pub fn mark_state(&self) -> Mark {
        self.mark
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.phase, Phase::Revealing(_))
    }

    pub fn can_advance(&self) -> bool {
        !self.is_typing()
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval()
    }

    /// One-based position of the current card and the list length.
    pub fn position(&self) -> (usize, usize) {
        (self.selector.index() + 1, self.selector.cards().len())
    }

    /// Stored results for the cards in this session.
    pub fn tally(&self) -> Tally {
        self.results.tally(self.selector.cards())
    }

    /// Appends the next character of the side being revealed.
    pub fn tick(&mut self) -> Option<char> {
        let Phase::Revealing(side) = self.phase else {
            return None;
        };

        let shown = self.visible.chars().count();
        let next = self.text.get(shown).copied();
        if let Some(c) = next {
            self.visible.push(c);
        }
        if self.visible.chars().count() >= self.text.len() {
            self.finish_reveal(side);
        }
        next
    }

    /// Shows the rest of the current side at once.
    pub fn cancel_reveal(&mut self) {
        if let Phase::Revealing(side) = self.phase {
            self.visible = self.text.iter().collect();
            self.finish_reveal(side);
        }
    }

    pub fn flip(&mut self) -> bool {
        match self.phase {
            Phase::Revealing(_) => false,
            Phase::Revealed(Side::Question) => {
                self.begin_reveal(Side::Answer);
                true
            }
            Phase::Revealed(Side::Answer) => {
                self.mark = Mark::Unmarked;
                self.begin_reveal(Side::Question);
                true
            }
        }
    }

    /// Records the result for the current card and writes it out immediately.
    pub fn mark(&mut self, correct: bool) -> Result<(), SessionError> {
        let path = self.selector.current().to_path_buf();
        self.mark = Mark::from_correct(correct);
        self.results.set(&path, correct);
        self.audio.play_once(if correct { Sound::Right } else { Sound::Wrong });
        tracing::debug!(path = %path.display(), correct, "marked flashcard");

        self.results.save(&self.results_path)?;
        Ok(())
    }

    /// Moves to the next card. Does nothing while a side is still being typed.
    pub fn advance(&mut self) -> bool {
        if self.is_typing() {
            return false;
        }
        let path = self.selector.next().to_path_buf();
        self.card = load_flashcard(&path);
        self.mark = Mark::Unmarked;
        self.begin_reveal(Side::Question);
        true
    }

    fn begin_reveal(&mut self, side: Side) {
        self.text = self.card.side(side).chars().collect();
        self.visible.clear();
        self.phase = Phase::Revealing(side);
        self.audio.play_looping(Sound::Typing);
    }

    fn finish_reveal(&mut self, side: Side) {
        self.phase = Phase::Revealed(side);
        self.audio.stop(Sound::Typing);
    }
}

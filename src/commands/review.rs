use std::path::PathBuf;
use std::time::Duration;

use crate::audio::audio_for;
use crate::card::Side;
use crate::commands::{choose_folder, resolve_directory};
use crate::palette::{Tone, dim};
use crate::results::Results;
use crate::selection::{Mode, SelectionError, build_card_list};
use crate::session::ReviewSession;
use crate::settings::{AppPaths, Settings};
use crate::tui::{Hint, Term, Theme, setup_terminal, teardown_terminal};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};
use tokio::time::{Instant, sleep_until};

const FLASH_SECS: f64 = 2.0;

pub struct ReviewOptions {
    pub directory: PathBuf,
    pub folder: Option<String>,
    pub mode: Mode,
    pub typing_speed: Option<u32>,
    pub mute: bool,
}

pub async fn run(paths: &AppPaths, settings: Settings, options: ReviewOptions) -> Result<()> {
    let Some(directory) = resolve_directory(&options.directory)? else {
        return Ok(());
    };
    let Some(folder) = choose_folder(&directory, options.folder)? else {
        return Ok(());
    };
    let folder_path = directory.join(&folder);

    let results = Results::load(&paths.results)
        .with_context(|| "Refusing to start a review with an unreadable results file")?;

    let cards = match build_card_list(options.mode, &folder_path, &results) {
        Ok(cards) => cards,
        Err(SelectionError::NoFlashcardsFound(_)) => {
            println!(
                "{} The folder {} does not contain any flashcard text files.",
                Tone::Warning.paint("No flashcards found."),
                Tone::Accent.paint(folder_path.display())
            );
            return Ok(());
        }
        Err(SelectionError::NoIncorrectCards(_)) => {
            println!(
                "{} You have no flashcards marked as incorrect in {}.",
                Tone::Correct.paint("No incorrect answers."),
                Tone::Accent.paint(&folder)
            );
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut settings = settings;
    if let Some(speed) = options.typing_speed {
        settings = settings.with_typing_speed(speed);
    }
    if options.mute {
        settings = settings.with_sound(false);
    }
    let sounds_dir = settings.sounds_dir_or(&paths.data_dir);
    let audio = audio_for(settings.sound_enabled, Some(sounds_dir.as_path()));

    let session = ReviewSession::start(
        cards,
        options.mode,
        settings,
        results,
        paths.results.clone(),
        audio,
    )?;
    start_review_session(session, folder).await
}

struct Flash {
    message: String,
    is_error: bool,
    shown_at: Instant,
}

impl Flash {
    fn new(message: impl Into<String>, is_error: bool) -> Self {
        Self {
            message: message.into(),
            is_error,
            shown_at: Instant::now(),
        }
    }

    fn expires_at(&self) -> Instant {
        self.shown_at + Duration::from_secs_f64(FLASH_SECS)
    }

    fn is_visible(&self) -> bool {
        self.shown_at.elapsed().as_secs_f64() < FLASH_SECS
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Quit,
    Handled,
    Ignored,
}

struct ReviewState {
    session: ReviewSession,
    folder: String,
    flash: Option<Flash>,
    next_tick: Option<Instant>,
}

impl ReviewState {
    fn new(session: ReviewSession, folder: String) -> Self {
        Self {
            session,
            folder,
            flash: None,
            next_tick: None,
        }
    }

    /// Next moment the loop has to wake up without user input.
    fn wake_at(&mut self, now: Instant) -> Option<Instant> {
        if self.session.is_typing() {
            let interval = self.session.tick_interval();
            self.next_tick.get_or_insert(now + interval);
        } else {
            self.next_tick = None;
        }

        let flash_expiry = self
            .flash
            .as_ref()
            .filter(|flash| flash.is_visible())
            .map(Flash::expires_at);

        match (self.next_tick, flash_expiry) {
            (Some(tick), Some(flash)) => Some(tick.min(flash)),
            (tick, flash) => tick.or(flash),
        }
    }

    fn on_timer(&mut self, now: Instant) {
        if let Some(deadline) = self.next_tick
            && now >= deadline
        {
            self.session.tick();
            // The next character is only scheduled once this one is on screen.
            self.next_tick = self
                .session
                .is_typing()
                .then(|| now + self.session.tick_interval());
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Esc
            || key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.session.cancel_reveal();
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('f') => {
                if self.session.flip() {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Char('n') | KeyCode::Right => {
                if self.session.advance() {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Char('r') | KeyCode::Char('y') => {
                self.mark(true);
                KeyOutcome::Handled
            }
            KeyCode::Char('w') | KeyCode::Char('x') => {
                self.mark(false);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn mark(&mut self, correct: bool) {
        self.flash = Some(match self.session.mark(correct) {
            Ok(()) => Flash::new(
                if correct {
                    "Marked right, saved."
                } else {
                    "Marked wrong, saved."
                },
                false,
            ),
            Err(err) => {
                tracing::error!(error = ?err, "failed to save results");
                let flat_error = anyhow::Error::from(err)
                    .chain()
                    .map(|cause| cause.to_string().replace('\n', " "))
                    .collect::<Vec<_>>()
                    .join(": ");
                Flash::new(format!("Unable to save result: {}", flat_error), true)
            }
        });
    }
}

async fn start_review_session(session: ReviewSession, folder: String) -> Result<()> {
    let mut terminal = setup_terminal()?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    let mut state = ReviewState::new(session, folder);
    let loop_result = review_loop(&mut terminal, &mut state).await;

    teardown_terminal(&mut terminal)?;

    let tally = state.session.tally();
    println!(
        "{} {} {} {} {} {}",
        dim("Right:"),
        Tone::Correct.paint(tally.correct),
        dim("Wrong:"),
        Tone::Incorrect.paint(tally.incorrect),
        dim("Unmarked:"),
        Tone::Info.paint(tally.unmarked),
    );

    loop_result
}

async fn review_loop(terminal: &mut Term, state: &mut ReviewState) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal
            .draw(|frame| render(frame, state))
            .context("failed to render frame")?;

        let wake_at = state.wake_at(Instant::now());
        tokio::select! {
            _ = wait_until(wake_at) => {
                state.on_timer(Instant::now());
            }
            event = events.next() => {
                match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if state.handle_key(key) == KeyOutcome::Quit {
                            return Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err).context("failed to read terminal event"),
                    None => return Ok(()),
                }
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn render(frame: &mut Frame<'_>, state: &ReviewState) {
    let session = &state.session;
    let area = frame.area();
    frame.render_widget(Clear, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(area);

    let (position, total) = session.position();
    let file_name = session
        .current_path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let header_line = Theme::joined([
        Span::styled(
            format!(" Card {}/{}", position, total),
            Theme::bold(Tone::Accent),
        ),
        Span::raw(format!("Topic: {}", session.flashcard().topic)),
        Span::raw(format!("{} / {}", state.folder, file_name)),
        Span::styled(format!("{} ", session.side().label()), Theme::emphasis()),
    ]);

    let mut body = session.visible_text().to_string();
    if session.is_typing() {
        body.push('▌');
    }
    let card_widget = Paragraph::new(body)
        .block(Theme::frame(header_line))
        .wrap(Wrap { trim: false });
    frame.render_widget(card_widget, chunks[0]);

    let footer =
        Paragraph::new(instructions_text(state)).block(Theme::heading("Controls"));
    frame.render_widget(footer, chunks[1]);
}

fn instructions_text(state: &ReviewState) -> Vec<Line<'static>> {
    let session = &state.session;
    let idle = !session.is_typing();
    let flip_label = match session.side() {
        Side::Question => "show answer",
        Side::Answer => "show question",
    };

    let mut lines = vec![Theme::hints([
        Hint::new("Space", flip_label).enabled(idle),
        Hint::new("R", "Right").tone(Tone::Correct),
        Hint::new("W", "Wrong").tone(Tone::Incorrect),
        Hint::new("N", "next card").enabled(idle),
        Hint::new("Esc", "exit"),
    ])];

    let tally = session.tally();
    let mark = session.mark_state();
    lines.push(Theme::joined([
        Span::raw(session.mode().label()),
        Span::styled(
            format!("Right {}", tally.correct),
            Theme::bold(Tone::Correct),
        ),
        Span::styled(
            format!("Wrong {}", tally.incorrect),
            Theme::bold(Tone::Incorrect),
        ),
        Span::styled(
            format!("Unmarked {}", tally.unmarked),
            Theme::plain(Tone::Muted),
        ),
        Span::styled(format!("This card: {}", mark.label()), Theme::mark(mark)),
    ]));

    if let Some(flash) = &state.flash
        && flash.is_visible()
    {
        lines.push(Line::from(Span::styled(
            flash.message.clone(),
            Theme::status(flash.is_error),
        )));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;
    use crate::card::Mark;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn state_with_cards(dir: &TempDir, count: usize) -> ReviewState {
        let cards: Vec<PathBuf> = (0..count)
            .map(|i| {
                let path = dir.path().join(format!("card{i}.txt"));
                fs::write(&path, format!("Topic: T\nQuestion:\nq{i}\nAnswer:\na{i}\n")).unwrap();
                path
            })
            .collect();
        let session = ReviewSession::start(
            cards,
            Mode::Sequential,
            Settings::default().with_typing_speed(100).with_sound(false),
            Results::default(),
            dir.path().join("results.json"),
            Box::new(Silent),
        )
        .unwrap();
        ReviewState::new(session, "Deck".to_string())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn flatten_line(line: &Line<'_>) -> String {
        line.spans
            .iter()
            .map(|span| span.content.to_string())
            .collect::<String>()
    }

    #[tokio::test(start_paused = true)]
    async fn timer_ticks_reveal_one_character_per_interval() {
        let dir = tempdir().unwrap();
        let mut state = state_with_cards(&dir, 1);
        let start = Instant::now();

        let first = state.wake_at(start).unwrap();
        assert_eq!(first - start, Duration::from_millis(10));
        state.on_timer(first);
        assert_eq!(state.session.visible_text(), "q");

        let second = state.wake_at(first).unwrap();
        state.on_timer(second);
        assert_eq!(state.session.visible_text(), "q0");
        assert!(!state.session.is_typing());
        assert_eq!(state.wake_at(second), None);
    }

    #[tokio::test(start_paused = true)]
    async fn early_timer_does_not_tick() {
        let dir = tempdir().unwrap();
        let mut state = state_with_cards(&dir, 1);
        let start = Instant::now();
        state.wake_at(start);
        state.on_timer(start);
        assert_eq!(state.session.visible_text(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn next_key_is_ignored_while_typing() {
        let dir = tempdir().unwrap();
        let mut state = state_with_cards(&dir, 2);
        assert_eq!(state.handle_key(press(KeyCode::Char('n'))), KeyOutcome::Ignored);
        assert_eq!(state.session.position(), (1, 2));

        state.session.cancel_reveal();
        assert_eq!(state.handle_key(press(KeyCode::Char('n'))), KeyOutcome::Handled);
        assert_eq!(state.session.position(), (2, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn mark_keys_save_and_flash() {
        let dir = tempdir().unwrap();
        let mut state = state_with_cards(&dir, 1);
        state.handle_key(press(KeyCode::Char('r')));
        assert_eq!(state.session.mark_state(), Mark::Correct);
        state.handle_key(press(KeyCode::Char('w')));
        assert_eq!(state.session.mark_state(), Mark::Incorrect);

        let stored = Results::load(&dir.path().join("results.json")).unwrap();
        assert_eq!(stored.get(&dir.path().join("card0.txt")), Some(false));

        let lines = instructions_text(&state);
        let last = flatten_line(lines.last().unwrap());
        assert!(last.contains("Marked wrong"));
    }

    #[tokio::test(start_paused = true)]
    async fn unwritable_results_show_an_error_flash() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let card = dir.path().join("card.txt");
        fs::write(&card, "Topic: T\nQuestion:\nq\nAnswer:\na\n").unwrap();
        let session = ReviewSession::start(
            vec![card],
            Mode::Sequential,
            Settings::default().with_sound(false),
            Results::default(),
            blocker.join("results.json"),
            Box::new(Silent),
        )
        .unwrap();
        let mut state = ReviewState::new(session, "Deck".to_string());

        assert_eq!(state.handle_key(press(KeyCode::Char('r'))), KeyOutcome::Handled);
        let flash = state.flash.as_ref().unwrap();
        assert!(flash.is_error);
        assert!(flash.message.starts_with("Unable to save result"));
    }

    #[tokio::test(start_paused = true)]
    async fn escape_quits_and_finishes_reveal() {
        let dir = tempdir().unwrap();
        let mut state = state_with_cards(&dir, 1);
        assert_eq!(state.handle_key(press(KeyCode::Esc)), KeyOutcome::Quit);
        assert!(!state.session.is_typing());
        assert_eq!(state.session.visible_text(), "q0");
    }

    #[tokio::test(start_paused = true)]
    async fn instructions_show_tally_and_mark() {
        let dir = tempdir().unwrap();
        let state = state_with_cards(&dir, 3);
        let lines = instructions_text(&state);
        let controls = flatten_line(&lines[0]);
        assert!(controls.contains("show answer"));
        assert!(controls.contains("next card"));

        let status = flatten_line(&lines[1]);
        assert!(status.contains("Unmarked 3"));
        assert!(status.contains("This card: Unmarked"));
    }
}

use crate::{
    card::Flashcard,
    commands::resolve_directory,
    palette::Tone,
    parser::{flashcard_files, format_flashcard, list_folders, parse},
    tui::{Editor, Hint, Term, Theme, setup_terminal, teardown_terminal},
    utils::{file_name_fragment, pluralize, trim_line},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use dialoguer::{Input, Select, theme::ColorfulTheme};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

const FLASH_SECS: f64 = 1.5;
const CREATE_NEW_FOLDER: &str = "Create new folder";

pub fn run(directory: PathBuf) -> Result<()> {
    let Some(directory) = resolve_directory(&directory)? else {
        return Ok(());
    };
    let Some(folder) = select_or_create_folder(&directory)? else {
        println!(
            "{}",
            Tone::Warning.paint("No folder selected; nothing created.")
        );
        return Ok(());
    };

    let created = capture_flashcards(&folder)?;
    println!(
        "Created {} in {}",
        Tone::Correct.paint(pluralize("flashcard", created)),
        Tone::Accent.paint(folder.display())
    );
    Ok(())
}

fn select_or_create_folder(directory: &Path) -> Result<Option<PathBuf>> {
    let mut items = list_folders(directory)?;
    let create_idx = items.len();
    items.push(CREATE_NEW_FOLDER.to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Folder for the new flashcards")
        .items(&items)
        .default(0)
        .interact_opt()
        .context("failed to read folder selection")?;

    let Some(idx) = selection else {
        return Ok(None);
    };
    if idx != create_idx {
        return Ok(Some(directory.join(&items[idx])));
    }

    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("New folder name")
        .allow_empty(true)
        .interact_text()
        .context("failed to read folder name")?;
    let Some(name) = trim_line(&name) else {
        return Ok(None);
    };
    create_folder(directory, name).map(Some)
}

fn create_folder(directory: &Path, name: &str) -> Result<PathBuf> {
    let folder = directory.join(file_name_fragment(name));
    fs::create_dir_all(&folder)
        .with_context(|| format!("Unable to create folder {}", folder.display()))?;
    tracing::info!(folder = %folder.display(), "created flashcard folder");
    Ok(folder)
}

/// Checks the editor contents and returns the card that would be written.
fn validate(contents: &str) -> Result<Flashcard> {
    let card = parse(contents)?;
    if trim_line(&card.topic).is_none() {
        bail!("The topic cannot be empty.");
    }
    if trim_line(&card.question).is_none() {
        bail!("The question cannot be empty.");
    }
    if trim_line(&card.answer).is_none() {
        bail!("The answer cannot be empty.");
    }
    Ok(card)
}

fn flashcard_path(folder: &Path, topic: &str, now: DateTime<Local>, attempt: usize) -> PathBuf {
    let stem = format!(
        "{}_{}",
        file_name_fragment(topic),
        now.format("%Y%m%d_%H%M%S")
    );
    if attempt == 0 {
        folder.join(format!("{stem}.txt"))
    } else {
        folder.join(format!("{stem}_{}.txt", attempt + 1))
    }
}

/// Writes a new flashcard file into `folder`, never overwriting an existing one.
fn save_flashcard(folder: &Path, card: &Flashcard, now: DateTime<Local>) -> Result<PathBuf> {
    let contents = format_flashcard(card);
    let mut attempt = 0;
    loop {
        let path = flashcard_path(folder, &card.topic, now, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())
                    .with_context(|| format!("Unable to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "saved flashcard");
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => {
                return Err(err).with_context(|| format!("Unable to create {}", path.display()));
            }
        }
    }
}

fn capture_flashcards(folder: &Path) -> Result<usize> {
    let mut terminal = setup_terminal()?;
    terminal.show_cursor()?;
    let editor_result = editor_loop(&mut terminal, folder);
    teardown_terminal(&mut terminal)?;
    editor_result
}

fn editor_loop(terminal: &mut Term, folder: &Path) -> Result<usize> {
    let mut editor = Editor::new();
    let mut status: Option<(String, bool)> = None;
    let mut last_save_attempt: Option<Instant> = None;
    let mut cards_in_folder = flashcard_files(folder)?.len();
    let mut created = 0;
    let mut view_height = 0usize;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(Clear, area);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(5)])
                .split(area);

            view_height = chunks[0].height.saturating_sub(2) as usize;
            editor.ensure_cursor_visible(view_height.max(1));

            let editor_widget = Paragraph::new(editor.content())
                .block(Theme::titled(folder.display().to_string()))
                .wrap(Wrap { trim: false })
                .scroll((editor.scroll_top() as u16, 0));
            frame.render_widget(editor_widget, chunks[0]);

            let mut help_lines = vec![
                Theme::hints([
                    Hint::new("Ctrl+S", "save"),
                    Hint::new("Ctrl+N", "clear"),
                    Hint::new("Esc", "exit"),
                ]),
                Theme::joined([
                    Span::styled(
                        format!("Flashcards in folder: {}", cards_in_folder),
                        Theme::bold(Tone::Accent),
                    ),
                    Span::styled(
                        format!("Created this session: {}", created),
                        Theme::bold(Tone::Accent),
                    ),
                ]),
            ];
            if let Some(time) = last_save_attempt
                && time.elapsed().as_secs_f64() < FLASH_SECS
                && let Some((message, is_error)) = &status
            {
                help_lines.push(Line::from(Span::styled(
                    message.clone(),
                    Theme::status(*is_error),
                )));
            }

            let instructions = Paragraph::new(help_lines)
                .block(Theme::heading("Help"))
                .wrap(Wrap { trim: true });
            frame.render_widget(instructions, chunks[1]);

            let (cursor_row, cursor_col) = editor.cursor();
            let visible_row = cursor_row.saturating_sub(editor.scroll_top());
            let cursor_x =
                chunks[0].x + 1 + (cursor_col as u16).min(chunks[0].width.saturating_sub(2));
            let cursor_y =
                chunks[0].y + 1 + (visible_row as u16).min(chunks[0].height.saturating_sub(2));
            frame.set_cursor_position((cursor_x, cursor_y));
        })?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (key.code == KeyCode::Char('c') && ctrl) {
            break;
        }
        if key.code == KeyCode::Char('n') && ctrl {
            editor.clear();
            continue;
        }
        if key.code == KeyCode::Char('s') && ctrl {
            last_save_attempt = Some(Instant::now());
            let saved = validate(&editor.content())
                .and_then(|card| save_flashcard(folder, &card, Local::now()).map(|p| (card, p)));
            status = Some(match saved {
                Ok((card, path)) => {
                    editor.next_card(&card.topic);
                    created += 1;
                    cards_in_folder += 1;
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    (format!("Flashcard saved as {}.", name), false)
                }
                Err(e) => {
                    let flat_error = e
                        .chain()
                        .map(|cause| cause.to_string().replace('\n', " "))
                        .collect::<Vec<_>>()
                        .join(": ");
                    (format!("Unable to save flashcard: {}", flat_error), true)
                }
            });
            continue;
        }

        match key.code {
            KeyCode::Char(c) if !ctrl => editor.insert_char(c),
            KeyCode::Enter => editor.insert_newline(),
            KeyCode::Tab => editor.insert_tab(),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Up => editor.move_up(),
            KeyCode::Down => editor.move_down(),
            KeyCode::Home => editor.move_home(),
            KeyCode::End => editor.move_end(),
            KeyCode::PageUp => {
                for _ in 0..view_height.max(1) {
                    editor.move_up();
                }
            }
            KeyCode::PageDown => {
                for _ in 0..view_height.max(1) {
                    editor.move_down();
                }
            }
            _ => {}
        }
    }

    Ok(created)
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use directories::ProjectDirs;

pub const FLASHCARD_EXTENSION: &str = "txt";

/// Only lowercase `.txt` counts; `NOTES.TXT` is left alone.
pub fn is_flashcard_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == FLASHCARD_EXTENSION)
}

pub fn trim_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Turns free text into something safe to use inside a file name.
pub fn file_name_fragment(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        } else if c.is_whitespace() && !out.ends_with('_') {
            out.push('_');
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() {
        "flashcard".to_string()
    } else {
        out
    }
}

pub fn ask_yn(prompt: String) -> Result<bool> {
    println!("{}", prompt);
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Proceed? ")
        .default(false)
        .report(true)
        .wait_for_newline(true)
        .interact()
        .context("failed to read confirmation")
}

pub fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "flashdeck")
        .ok_or_else(|| anyhow!("Could not determine project directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flashcard_file() {
        assert!(is_flashcard_file(Path::new("cards/test.txt")));
        assert!(!is_flashcard_file(Path::new("cards/TEST.TXT")));
        assert!(!is_flashcard_file(Path::new("cards/test.Txt")));
        assert!(!is_flashcard_file(Path::new("test.md")));
        assert!(!is_flashcard_file(Path::new("txt")));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("card", 1), "1 card");
        assert_eq!(pluralize("card", 0), "0 cards");
        assert_eq!(pluralize("flashcard", 3), "3 flashcards");
    }

    #[test]
    fn test_file_name_fragment() {
        assert_eq!(file_name_fragment("World History"), "World_History");
        assert_eq!(file_name_fragment("  a/b: c?  "), "ab_c");
        assert_eq!(file_name_fragment("???"), "flashcard");
    }

    #[test]
    fn test_trim_line() {
        assert_eq!(trim_line("  hi "), Some("hi"));
        assert_eq!(trim_line("   "), None);
    }
}

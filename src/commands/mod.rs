pub mod clear;
pub mod create;
pub mod folders;
pub mod review;
pub mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

use crate::palette::Tone;
use crate::parser::list_folders;

/// Canonical flashcard directory, or `None` after telling the user it is missing.
pub(crate) fn resolve_directory(directory: &Path) -> Result<Option<PathBuf>> {
    if !directory.is_dir() {
        println!(
            "{} {} is not a directory. Please select the directory where your flashcard folders are located.",
            Tone::Warning.paint("No directory selected."),
            Tone::Accent.paint(directory.display())
        );
        return Ok(None);
    }
    let canonical = directory
        .canonicalize()
        .with_context(|| format!("Unable to resolve {}", directory.display()))?;
    tracing::debug!(directory = %canonical.display(), "resolved flashcard directory");
    Ok(Some(canonical))
}

/// Uses `requested` when given, otherwise asks the user to pick a subfolder.
pub(crate) fn choose_folder(directory: &Path, requested: Option<String>) -> Result<Option<String>> {
    if let Some(folder) = requested {
        if directory.join(&folder).is_dir() {
            return Ok(Some(folder));
        }
        println!(
            "{} {} is not a folder inside {}.",
            Tone::Warning.paint("No folder selected."),
            Tone::Accent.paint(&folder),
            directory.display()
        );
        return Ok(None);
    }

    let folders = list_folders(directory)?;
    if folders.is_empty() {
        println!(
            "{} {} has no folders. Create one with `flashdeck create`.",
            Tone::Warning.paint("No folder selected."),
            Tone::Accent.paint(directory.display())
        );
        return Ok(None);
    }

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select folder")
        .items(&folders)
        .default(0)
        .interact_opt()
        .context("failed to read folder selection")?;

    match selection {
        Some(idx) => Ok(Some(folders[idx].clone())),
        None => {
            println!(
                "{}",
                Tone::Warning.paint("No folder selected.")
            );
            Ok(None)
        }
    }
}

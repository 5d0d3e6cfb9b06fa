use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use ignore::WalkBuilder;

use crate::utils::is_flashcard_file;

/// Immediate subfolders of a flashcard directory, sorted by name.
pub fn list_folders(directory: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("Unable to read directory {}", directory.display()))?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            folders.push(name.to_string());
        }
    }
    folders.sort();
    Ok(folders)
}

/// Every flashcard file below `folder`, recursively, sorted by path.
pub fn flashcard_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(anyhow!("Folder does not exist: {}", folder.display()));
    }

    let mut builder = WalkBuilder::new(folder);
    builder
        .hidden(false)
        .git_ignore(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", folder.display()))?;
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        if is_flashcard_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::commands::resolve_directory;
use crate::palette::{Tone, dim};
use crate::parser::{flashcard_files, list_folders};
use crate::results::{Results, Tally};
use crate::settings::AppPaths;
use crate::utils::pluralize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub name: String,
    pub flashcards: usize,
    pub tally: Tally,
}

pub fn summarize(directory: &Path, results: &Results) -> Result<Vec<FolderSummary>> {
    let mut summaries = Vec::new();
    for name in list_folders(directory)? {
        let files: Vec<PathBuf> = flashcard_files(&directory.join(&name))?;
        summaries.push(FolderSummary {
            flashcards: files.len(),
            tally: results.tally(&files),
            name,
        });
    }
    Ok(summaries)
}

pub fn run(paths: &AppPaths, directory: PathBuf) -> Result<()> {
    let Some(directory) = resolve_directory(&directory)? else {
        return Ok(());
    };
    let results = Results::load(&paths.results).context("Unable to load results")?;
    let summaries = summarize(&directory, &results)?;

    println!(
        "{} {}",
        Tone::Accent.paint("Flashcard directory"),
        dim(directory.display())
    );
    if summaries.is_empty() {
        println!(
            "{}",
            dim("No folders yet. Create one with `flashdeck create`.")
        );
        return Ok(());
    }

    let width = summaries
        .iter()
        .map(|summary| summary.name.chars().count())
        .max()
        .unwrap_or(0);
    for summary in &summaries {
        println!("{}", format_summary(summary, width));
    }
    Ok(())
}

fn format_summary(summary: &FolderSummary, width: usize) -> String {
    format!(
        "{:<width$}  {}  {} {} {} {} {} {}",
        summary.name,
        Tone::Info.paint(pluralize("flashcard", summary.flashcards)),
        dim("right"),
        Tone::Correct.paint(summary.tally.correct),
        dim("wrong"),
        Tone::Incorrect.paint(summary.tally.incorrect),
        dim("unmarked"),
        Tone::Muted.paint(summary.tally.unmarked),
        width = width
    )
}

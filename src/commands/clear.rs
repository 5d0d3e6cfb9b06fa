use std::path::Path;

use anyhow::{Context, Result};

use crate::palette::Tone;
use crate::results::Results;
use crate::settings::AppPaths;
use crate::utils::{ask_yn, pluralize, trim_line};

#[derive(Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    NoResultsFile,
    Cleared(usize),
}

/// Removes every stored result whose path contains `category`.
pub fn clear_results(results_path: &Path, category: &str) -> Result<ClearOutcome> {
    if !results_path.is_file() {
        return Ok(ClearOutcome::NoResultsFile);
    }
    let mut results = Results::load(results_path).context("Unable to load results")?;
    let removed = results.clear_category(category);
    results
        .save(results_path)
        .context("Unable to save cleared results")?;
    tracing::info!(category, removed, "cleared results");
    Ok(ClearOutcome::Cleared(removed))
}

pub fn run(paths: &AppPaths, category: String, assume_yes: bool) -> Result<()> {
    let Some(category) = trim_line(&category) else {
        println!(
            "{}",
            Tone::Warning.paint("No folder selected. Please name a folder to clear results for.")
        );
        return Ok(());
    };

    if !paths.results.is_file() {
        println!(
            "{} No results file found to clear.",
            Tone::Warning.paint("No results found.")
        );
        return Ok(());
    }

    let confirmed = assume_yes
        || ask_yn(format!(
            "Clear the results for category '{}'? Every stored path containing this text is removed.",
            Tone::Accent.paint(category)
        ))?;
    if !confirmed {
        println!("Results for category '{}' have not been cleared.", category);
        return Ok(());
    }

    match clear_results(&paths.results, category)? {
        ClearOutcome::NoResultsFile => println!("No results file found to clear."),
        ClearOutcome::Cleared(removed) => println!(
            "Results for category '{}' have been cleared ({} removed).",
            category,
            pluralize("result", removed)
        ),
    }
    Ok(())
}

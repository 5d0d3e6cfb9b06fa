//! Per-file right/wrong results, kept in one JSON document per installation.
//!
//! ```json
//! { "flashcards": { "/cards/Math/addition.txt": true } }
//! ```
//!
//! Clearing a category is a substring match over the stored paths, so clearing
//! `Math` also clears `Math2` and anything else whose path mentions `Math`.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const RESULTS_FILE_NAME: &str = "flashcard_results.json";

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("results file at {path} is not valid JSON")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access results file at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    #[serde(default)]
    flashcards: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub incorrect: usize,
    pub unmarked: usize,
}

pub fn result_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Results {
    /// Reads the document at `path`. A missing or blank file is an empty store.
    pub fn load(path: &Path) -> Result<Self, ResultsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no results file yet, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ResultsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&contents).map_err(|source| ResultsError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces the whole document at `path`.
    pub fn save(&self, path: &Path) -> Result<(), ResultsError> {
        let io_err = |source| ResultsError::Io {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(io_err)?;

        let contents = serde_json::to_string_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        writeln!(tmp, "{}", contents).map_err(io_err)?;
        tmp.persist(path).map_err(|err| io_err(err.error))?;

        tracing::debug!(path = %path.display(), entries = self.flashcards.len(), "saved results");
        Ok(())
    }

    pub fn get(&self, card: &Path) -> Option<bool> {
        self.flashcards.get(&result_key(card)).copied()
    }

    /// Records a result; the previous value for the card is returned.
    pub fn set(&mut self, card: &Path, correct: bool) -> Option<bool> {
        self.flashcards.insert(result_key(card), correct)
    }

    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }

    /// Drops every entry whose key contains `category`, returning how many went.
    pub fn clear_category(&mut self, category: &str) -> usize {
        let before = self.flashcards.len();
        self.flashcards.retain(|key, _| !key.contains(category));
        before - self.flashcards.len()
    }

    /// Cards marked wrong whose path starts with `folder`.
    pub fn incorrect_in(&self, folder: &Path) -> Vec<PathBuf> {
        let prefix = result_key(folder);
        self.flashcards
            .iter()
            .filter(|(key, correct)| !**correct && key.starts_with(&prefix))
            .map(|(key, _)| PathBuf::from(key))
            .collect()
    }

    pub fn tally<'a>(&self, cards: impl IntoIterator<Item = &'a PathBuf>) -> Tally {
        let mut tally = Tally::default();
        for card in cards {
            match self.get(card) {
                Some(true) => tally.correct += 1,
                Some(false) => tally.incorrect += 1,
                None => tally.unmarked += 1,
            }
        }
        tally
    }
}

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rand::Rng;
use thiserror::Error;

use crate::parser::flashcard_files;
use crate::results::Results;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no flashcard files found in {}", .0.display())]
    NoFlashcardsFound(PathBuf),

    #[error("no flashcards marked as incorrect in {}", .0.display())]
    NoIncorrectCards(PathBuf),

    #[error(transparent)]
    Enumerate(#[from] anyhow::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Random,
    Sequential,
    /// Only cards last marked wrong, in order
    #[value(name = "incorrect")]
    IncorrectOnly,
}

impl Mode {
    pub fn order(self) -> Order {
        match self {
            Mode::Random => Order::Random,
            Mode::Sequential | Mode::IncorrectOnly => Order::Sequential,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Random => "Random",
            Mode::Sequential => "Sequential",
            Mode::IncorrectOnly => "Incorrect only",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Random,
    Sequential,
}

/// Builds the fixed card list a session walks over.
pub fn build_card_list(
    mode: Mode,
    folder: &Path,
    results: &Results,
) -> Result<Vec<PathBuf>, SelectionError> {
    let cards = match mode {
        Mode::Random | Mode::Sequential => {
            let files = flashcard_files(folder)?;
            if files.is_empty() {
                return Err(SelectionError::NoFlashcardsFound(folder.to_path_buf()));
            }
            files
        }
        Mode::IncorrectOnly => {
            let files = results.incorrect_in(folder);
            if files.is_empty() {
                return Err(SelectionError::NoIncorrectCards(folder.to_path_buf()));
            }
            files
        }
    };
    tracing::debug!(mode = mode.label(), cards = cards.len(), folder = %folder.display(), "built card list");
    Ok(cards)
}

#[derive(Debug)]
pub struct Selector {
    cards: Vec<PathBuf>,
    order: Order,
    index: usize,
}

impl Selector {
    /// Picks the first card. Returns `None` for an empty list.
    pub fn new(cards: Vec<PathBuf>, order: Order) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        let mut selector = Self {
            cards,
            order,
            index: 0,
        };
        if order == Order::Random {
            selector.index = selector.random_index();
        }
        Some(selector)
    }

    pub fn current(&self) -> &Path {
        &self.cards[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cards(&self) -> &[PathBuf] {
        &self.cards
    }

    pub fn next(&mut self) -> &Path {
        self.index = match self.order {
            // With replacement: the same card may come up twice in a row.
            Order::Random => self.random_index(),
            Order::Sequential => (self.index + 1) % self.cards.len(),
        };
        self.current()
    }

    fn random_index(&self) -> usize {
        rand::rng().random_range(0..self.cards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("card{i}.txt"))).collect()
    }

    #[test]
    fn empty_list_has_no_selector() {
        assert!(Selector::new(Vec::new(), Order::Sequential).is_none());
    }

    #[test]
    fn sequential_visits_every_card_and_wraps() {
        for n in 1..6 {
            let mut selector = Selector::new(paths(n), Order::Sequential).unwrap();
            let mut visited = vec![selector.index()];
            for _ in 0..(2 * n) {
                selector.next();
                visited.push(selector.index());
            }
            let expected: Vec<usize> = (0..=2 * n).map(|i| i % n).collect();
            assert_eq!(visited, expected);
        }
    }

    #[test]
    fn single_card_loops_to_itself() {
        let mut selector = Selector::new(paths(1), Order::Sequential).unwrap();
        assert_eq!(selector.next(), Path::new("card0.txt"));
        assert_eq!(selector.index(), 0);
    }

    #[test]
    fn random_stays_in_bounds() {
        let mut selector = Selector::new(paths(4), Order::Random).unwrap();
        for _ in 0..100 {
            selector.next();
            assert!(selector.index() < 4);
        }
    }

    #[test]
    fn incorrect_only_selects_wrong_cards_in_folder() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("Math");
        fs::create_dir_all(&folder).unwrap();
        let mut results = Results::default();
        for (name, correct) in [("a.txt", true), ("b.txt", true), ("c.txt", false)] {
            let path = folder.join(name);
            fs::write(&path, "Topic: t\nQuestion:\nq\nAnswer:\na\n").unwrap();
            results.set(&path, correct);
        }

        let cards = build_card_list(Mode::IncorrectOnly, &folder, &results).unwrap();
        assert_eq!(cards, vec![folder.join("c.txt")]);
    }

    #[test]
    fn incorrect_only_without_wrong_cards_fails() {
        let dir = tempdir().unwrap();
        let err = build_card_list(Mode::IncorrectOnly, dir.path(), &Results::default())
            .unwrap_err();
        assert!(matches!(err, SelectionError::NoIncorrectCards(_)));
    }

    #[test]
    fn empty_folder_has_no_flashcards() {
        let dir = tempdir().unwrap();
        let err = build_card_list(Mode::Sequential, dir.path(), &Results::default()).unwrap_err();
        assert!(matches!(err, SelectionError::NoFlashcardsFound(_)));
    }

    #[test]
    fn incorrect_mode_walks_in_order() {
        assert_eq!(Mode::IncorrectOnly.order(), Order::Sequential);
        assert_eq!(Mode::Random.order(), Order::Random);
    }
}

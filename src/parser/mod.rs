pub mod discover;
pub mod flashcard;

pub use discover::{flashcard_files, list_folders};
pub use flashcard::{ParseError, format_flashcard, load_flashcard, parse};

pub mod editor;
pub mod terminal;
pub mod theme;

pub use editor::Editor;
pub use terminal::{Term, setup_terminal, teardown_terminal};
pub use theme::{Hint, Theme};

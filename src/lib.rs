pub mod audio;
pub mod card;
pub mod commands;
pub mod logging;
pub mod palette;
pub mod parser;
pub mod results;
pub mod selection;
pub mod session;
pub mod settings;
pub mod tui;
pub mod utils;

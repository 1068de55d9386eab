//! Output formatting module for CLI

mod terminal;

pub use terminal::{format_duration, TerminalOutput};

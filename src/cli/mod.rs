//! Terminal frontend - Line-oriented rendering, stdin input, and commands

pub mod list;
pub mod play;
pub mod render;
pub mod terminal;

pub use list::run_list;
pub use play::{PlayOptions, load_certification, run_play};
pub use terminal::{StdinInput, TerminalPresenter, clear_screen};

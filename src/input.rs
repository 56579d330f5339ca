//! Player input: line sources and command classification
//!
//! The controller never parses raw text itself. It reads through an
//! [`InputSource`] and branches on the [`Command`] tags produced by
//! [`classify`].

use std::collections::VecDeque;

const QUIT_COMMANDS: &[&str] = &["quit", "exit", "q", "bye"];
const HELP_COMMANDS: &[&str] = &["help", "h", "?"];
const STATUS_COMMANDS: &[&str] = &["status", "stats", "s"];
const THEME_COMMANDS: &[&str] = &["0", "c", "change", "theme", "switch"];
const CONFIRM_ANSWERS: &[&str] = &["", "y", "yes", "yeah", "yep", "ok", "sure"];

/// Classified response to a scenario prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A 1-based choice number within range
    Choice(usize),
    Quit,
    Help,
    Status,
    ToggleTheme,
    Invalid,
    /// Input ended or was interrupted
    Cancelled,
}

/// Classify one raw line against a prompt offering `num_choices` options
pub fn classify(raw: &str, num_choices: usize) -> Command {
    let input = raw.trim().to_lowercase();
    let input = input.as_str();

    if QUIT_COMMANDS.contains(&input) {
        return Command::Quit;
    }
    if HELP_COMMANDS.contains(&input) {
        return Command::Help;
    }
    if STATUS_COMMANDS.contains(&input) {
        return Command::Status;
    }
    if THEME_COMMANDS.contains(&input) {
        return Command::ToggleTheme;
    }

    match input.parse::<usize>() {
        Ok(choice) if (1..=num_choices).contains(&choice) => Command::Choice(choice),
        _ => Command::Invalid,
    }
}

pub fn is_quit_word(raw: &str) -> bool {
    QUIT_COMMANDS.contains(&raw.trim().to_lowercase().as_str())
}

/// A source of player input lines.
///
/// `read_line` returns `None` when input is cancelled (end of input or an
/// interrupted read). The provided methods build the game's prompts on top
/// of it and map cancellation to a quit signal.
pub trait InputSource {
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Read a scenario command
    fn read_command(&mut self, prompt: &str, num_choices: usize) -> Command {
        match self.read_line(prompt) {
            Some(line) => classify(&line, num_choices),
            None => Command::Cancelled,
        }
    }

    /// Read free-form text. Returns `None` on cancellation or a quit word.
    ///
    /// Empty lines are re-prompted unless `allow_empty` is set.
    fn read_text(&mut self, prompt: &str, allow_empty: bool) -> Option<String> {
        loop {
            let line = self.read_line(prompt)?;
            let line = line.trim();
            if is_quit_word(line) {
                return None;
            }
            if line.is_empty() && !allow_empty {
                continue;
            }
            return Some(line.to_string());
        }
    }

    /// Yes/no question defaulting to yes. Cancellation counts as yes, so a
    /// closed input always unwinds to the end of the session.
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.read_line(prompt) {
            Some(line) => CONFIRM_ANSWERS.contains(&line.trim().to_lowercase().as_str()),
            None => true,
        }
    }

    /// Block until the player presses Enter; cancellation is ignored
    fn wait_for_enter(&mut self, prompt: &str) {
        let _ = self.read_line(prompt);
    }
}

impl<I: InputSource + ?Sized> InputSource for &mut I {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        (**self).read_line(prompt)
    }
}

/// Input replayed from a fixed list of lines; cancels once exhausted.
///
/// Used by tests and by non-interactive runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front()
    }
}

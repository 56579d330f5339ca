//! Terminal collaborators: stdin input and stdout presenter

use crate::cli::render;
use crate::domain::Player;
use crate::game::{GameEvent, Presenter};
use crate::input::InputSource;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::pin::Pin;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

/// Default per-character delay of the typewriter effect
pub const TYPEWRITER_DELAY: Duration = Duration::from_millis(15);

/// Clear the terminal screen (cross-platform)
pub fn clear_screen() {
    // ANSI escape codes work on most terminals
    print!("\x1b[2J\x1b[H");

    // Fallback: push old output off screen
    if io::stdout().flush().is_err() {
        for _ in 0..50 {
            println!();
        }
    }
}

/// Resolves when the player presses Ctrl-C
type Interrupt = Pin<Box<dyn Future<Output = io::Result<()>>>>;

enum Received {
    Line(Option<String>),
    Interrupted,
    NoSignalHandler(io::Error),
}

/// Line input from standard input.
///
/// Lines are read on a dedicated thread and handed over through a channel,
/// so a prompt can wait for either the next line or Ctrl-C. End of input
/// and Ctrl-C both cancel, and every later read stays cancelled.
pub struct StdinInput {
    runtime: Runtime,
    lines: mpsc::UnboundedReceiver<String>,
    interrupt: Interrupt,
    cancelled: bool,
}

impl StdinInput {
    pub fn new() -> io::Result<Self> {
        let (sender, lines) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("stdin".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if sender.send(line).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            log::debug!("Input interrupted: {}", e);
                            break;
                        }
                    }
                }
            })?;

        Self::from_channel(lines, tokio::signal::ctrl_c())
    }

    /// Input fed from `lines` and cancelled once `interrupt` resolves
    pub(crate) fn from_channel(
        lines: mpsc::UnboundedReceiver<String>,
        interrupt: impl Future<Output = io::Result<()>> + 'static,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            lines,
            interrupt: Box::pin(interrupt),
            cancelled: false,
        })
    }

    fn receive(&mut self) -> Received {
        let lines = &mut self.lines;
        let interrupt = &mut self.interrupt;
        self.runtime.block_on(async {
            tokio::select! {
                biased;
                line = lines.recv() => Received::Line(line),
                result = interrupt => match result {
                    Ok(()) => Received::Interrupted,
                    Err(e) => Received::NoSignalHandler(e),
                },
            }
        })
    }
}

impl InputSource for StdinInput {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if self.cancelled {
            return None;
        }
        if !prompt.is_empty() {
            print!("{}", prompt);
            if let Err(e) = io::stdout().flush() {
                log::debug!("Failed to flush prompt: {}", e);
            }
        }

        loop {
            match self.receive() {
                Received::Line(Some(line)) => return Some(line),
                Received::Line(None) => {
                    log::debug!("End of input");
                    self.cancelled = true;
                    return None;
                }
                Received::Interrupted => {
                    log::debug!("Interrupted at prompt");
                    println!();
                    self.cancelled = true;
                    return None;
                }
                Received::NoSignalHandler(e) => {
                    log::warn!("Ctrl-C will not end the session cleanly: {}", e);
                    self.interrupt = Box::pin(std::future::pending::<io::Result<()>>());
                }
            }
        }
    }
}

/// Presenter that prints rendered events to stdout
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    width: usize,
    debug: bool,
    typewriter: Option<Duration>,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            width: 80,
            debug: false,
            typewriter: None,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Print the player state as JSON after every turn
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Print narrative panels one character at a time
    pub fn with_typewriter(mut self, delay: Option<Duration>) -> Self {
        self.typewriter = delay;
        self
    }

    fn emit(&self, text: &str) {
        println!("{}", text);
    }

    fn narrate(&self, text: &str) {
        match self.typewriter {
            Some(delay) => slow_print(text, delay),
            None => self.emit(text),
        }
    }

    fn display_debug_info(&self, player: &Player) {
        println!("[debug]");
        let state = serde_json::to_string(player).unwrap_or_else(|_| "{}".to_string());
        println!("player={}", state);
        println!();
    }
}

fn slow_print(text: &str, delay: Duration) {
    let mut stdout = io::stdout();
    for ch in text.chars() {
        print!("{}", ch);
        if stdout.flush().is_err() {
            break;
        }
        thread::sleep(delay);
    }
    println!();
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, event: &GameEvent<'_>) {
        let width = self.width;
        match event {
            GameEvent::TitleScreen { certification } => {
                clear_screen();
                self.emit(&render::render_title_screen(certification));
            }
            GameEvent::ThemeMenu { themes } => self.emit(&render::render_theme_menu(themes)),
            GameEvent::InvalidThemeChoice { theme_count } => {
                self.emit(&render::render_invalid_theme_choice(*theme_count))
            }
            GameEvent::ThemeChosen {
                certification,
                theme,
            } => {
                clear_screen();
                self.emit(&render::render_theme_title(certification, theme));
            }
            GameEvent::Introduction {
                certification,
                theme,
            } => self.narrate(&render::render_introduction(certification, theme, width)),
            GameEvent::NamePrompt { theme } => self.emit(&render::render_name_prompt(theme)),
            GameEvent::Welcome { name, theme } => self.emit(&render::render_welcome(name, theme)),
            GameEvent::DomainMenu {
                certification,
                theme,
            } => {
                clear_screen();
                self.emit(&render::render_domain_menu(certification, theme));
            }
            GameEvent::InvalidDomainChoice { domain_count } => {
                self.emit(&render::render_invalid_domain_choice(*domain_count))
            }
            GameEvent::DomainJump {
                domain,
                domain_name,
                skipped_domains,
                skipped_xp,
                theme,
            } => self.emit(&render::render_domain_jump(
                *domain,
                domain_name,
                *skipped_domains,
                *skipped_xp,
                theme.voice,
            )),
            GameEvent::DomainIntroduction {
                domain,
                info,
                intro,
                theme,
            } => {
                clear_screen();
                if let Some(info) = info {
                    self.emit(&render::render_domain_banner(*domain, info, &theme.key));
                }
                self.narrate(&render::render_narrative(
                    &intro.introduction,
                    &intro.narrator,
                    width,
                ));
            }
            GameEvent::DomainAdvanced {
                domain,
                domain_name,
                theme,
            } => self.narrate(&render::render_domain_advanced(
                *domain,
                domain_name,
                theme.voice,
                width,
            )),
            GameEvent::Hud {
                player,
                certification,
                theme,
                redraw,
            } => {
                if *redraw {
                    clear_screen();
                }
                self.emit(&render::render_hud(player, certification, theme));
            }
            GameEvent::Scenario { content, .. } => {
                self.emit(&render::render_narrative(
                    &content.narrative,
                    &content.title,
                    width,
                ));
                self.emit(&render::render_choices(&content.choice_texts(), true));
            }
            GameEvent::Choices { content } => {
                self.emit(&render::render_choices(&content.choice_texts(), true))
            }
            GameEvent::Help { certification } => self.emit(&render::render_help(certification)),
            GameEvent::ThemeSwitched { theme } => {
                self.emit(&render::render_theme_switched(theme))
            }
            GameEvent::InvalidChoice { num_choices } => {
                self.emit(&render::render_invalid_choice(*num_choices))
            }
            GameEvent::Success {
                text,
                xp_gained,
                hp_healed,
            } => self.emit(&render::render_success(text, *xp_gained, *hp_healed, width)),
            GameEvent::Failure {
                text,
                hp_lost,
                reference,
                correct_number,
                correct_text,
            } => self.emit(&render::render_failure(
                text,
                *hp_lost,
                reference,
                *correct_number,
                *correct_text,
                width,
            )),
            GameEvent::TitleEarned { title, theme } => {
                self.emit(&render::render_promotion(title, theme.voice))
            }
            GameEvent::TurnFinished { player } => {
                if self.debug {
                    self.display_debug_info(player);
                }
            }
            GameEvent::Ending { summary, theme } => {
                clear_screen();
                self.narrate(&render::render_closing(summary, theme, width));
                self.emit(&render::render_summary(summary));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CertificationConfig, Choice, Scenario, ThemedContent};
    use crate::game::{GameController, RecordingPresenter};
    use std::collections::BTreeMap;

    fn channel(lines: &[&str]) -> (mpsc::UnboundedSender<String>, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        for line in lines {
            sender.send(line.to_string()).unwrap();
        }
        (sender, receiver)
    }

    #[test]
    fn lines_then_end_of_input() {
        let (sender, receiver) = channel(&["1", "abc"]);
        drop(sender);
        let mut input =
            StdinInput::from_channel(receiver, std::future::pending::<io::Result<()>>()).unwrap();

        assert_eq!(input.read_line(""), Some("1".to_string()));
        assert_eq!(input.read_line(""), Some("abc".to_string()));
        assert_eq!(input.read_line(""), None);
        assert_eq!(input.read_line(""), None);
    }

    #[test]
    fn interrupt_cancels_waiting_prompt_for_good() {
        let (sender, receiver) = channel(&[]);
        let mut input = StdinInput::from_channel(receiver, std::future::ready(Ok(()))).unwrap();

        assert_eq!(input.read_line(""), None);
        sender.send("1".to_string()).unwrap();
        assert_eq!(input.read_line(""), None);
    }

    #[test]
    fn failed_signal_handler_keeps_reading() {
        let (sender, receiver) = channel(&[]);
        let failing = std::future::ready(Err(io::Error::other("no signals")));
        let mut input = StdinInput::from_channel(receiver, failing).unwrap();

        let typist = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender.send("2".to_string()).unwrap();
        });

        assert_eq!(input.read_line(""), Some("2".to_string()));
        typist.join().unwrap();
        assert_eq!(input.read_line(""), None);
    }

    #[test]
    fn interrupt_during_scenario_reaches_ending() {
        let content = ThemedContent {
            choices: vec![Choice::new("Bar the gate"), Choice::new("Open it")],
            ..Default::default()
        };
        let mut scenarios = BTreeMap::new();
        scenarios.insert(1, vec![Scenario::new("gate", 1).with_theme("fantasy", content)]);
        let config = CertificationConfig {
            name: "DEMO".to_string(),
            domain_count: 1,
            scenarios,
            ..Default::default()
        };

        let (_sender, receiver) = channel(&["1", "", "Ayla", "", ""]);
        let input = StdinInput::from_channel(receiver, std::future::ready(Ok(()))).unwrap();
        let mut presenter = RecordingPresenter::new();
        let mut game = GameController::with_seed(config, input, &mut presenter, 3);

        let summary = game.run().expect("player was named");
        drop(game);

        assert_eq!(summary.player_name, "Ayla");
        assert_eq!(summary.total_answers(), 0);
        assert_eq!(presenter.count("scenario"), 1);
        assert!(presenter.saw("ending"));
    }
}

//! Game controller - the session state machine
//!
//! A session walks `SelectTheme → Intro → NameEntry → DomainSelect →
//! Playing → Ended`. While playing, each turn picks the next unplayed
//! scenario of the current domain, collects one command from the input
//! collaborator and applies the result to the player.
//!
//! The controller owns the player, the theme manager and the scenario bank.
//! It reads through an [`InputSource`] and reports through a [`Presenter`];
//! it never formats text itself.

pub mod bank;
pub mod ending;
pub mod event;

pub use bank::ScenarioBank;
pub use ending::{DomainResult, EndingBand, Readiness, SessionSummary};
pub use event::{GameEvent, Presenter, RecordingPresenter};

use crate::domain::{CertificationConfig, Player, Scenario, ThemeManager};
use crate::input::{Command, InputSource};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Hp restored by a correct answer while below max
pub const HEAL_ON_SUCCESS: u32 = 5;

const CONTINUE_PROMPT: &str = "\n  Press ENTER to continue...";

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    SelectTheme,
    Intro,
    NameEntry,
    DomainSelect,
    Playing,
    Ended,
}

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Success {
        xp_gained: u32,
        hp_healed: u32,
        title_changed: bool,
    },
    Failure {
        chosen_index: usize,
        hp_lost: u32,
    },
    /// The player quit (or input was cancelled) before answering
    Abandoned,
}

pub struct GameController<I, P> {
    config: CertificationConfig,
    themes: ThemeManager,
    bank: ScenarioBank,
    player: Player,
    /// Set once the player has entered a name
    player_named: bool,
    phase: GamePhase,
    input: I,
    presenter: P,
}

impl<I: InputSource, P: Presenter> GameController<I, P> {
    /// Create a controller whose scenario sampling is seeded from entropy
    pub fn new(config: CertificationConfig, input: I, presenter: P) -> Self {
        Self::with_rng(config, input, presenter, StdRng::from_entropy())
    }

    /// Create a controller with reproducible scenario sampling
    pub fn with_seed(config: CertificationConfig, input: I, presenter: P, seed: u64) -> Self {
        Self::with_rng(config, input, presenter, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CertificationConfig, input: I, presenter: P, rng: StdRng) -> Self {
        let themes = ThemeManager::new(config.themes.clone());
        let bank = ScenarioBank::from_config(&config, rng);
        let player = Player::from_certification("", &config);

        Self {
            config,
            themes,
            bank,
            player,
            player_named: false,
            phase: GamePhase::SelectTheme,
            input,
            presenter,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn config(&self) -> &CertificationConfig {
        &self.config
    }

    pub fn themes(&self) -> &ThemeManager {
        &self.themes
    }

    pub fn themes_mut(&mut self) -> &mut ThemeManager {
        &mut self.themes
    }

    pub fn bank_mut(&mut self) -> &mut ScenarioBank {
        &mut self.bank
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Name the player and begin the session proper
    pub fn start_player(&mut self, name: impl Into<String>) {
        self.player.name = name.into();
        self.player_named = true;
    }

    /// Start at `target` instead of domain 1, crediting skipped domains.
    ///
    /// Returns the xp awarded, or `None` for a domain outside
    /// `1..=domain_count`.
    pub fn jump_to_domain(&mut self, target: u32) -> Option<u32> {
        let awarded = self
            .player
            .jump_to_domain(target, self.config.scoring.xp_per_domain())?;
        log::debug!("Starting at domain {} with {} skipped xp", target, awarded);
        Some(awarded)
    }

    /// Next unplayed scenario of the player's current domain
    pub fn next_scenario(&mut self) -> Option<Scenario> {
        let domain = self.player.current_domain();
        self.bank.next_unplayed(domain, &self.player).cloned()
    }

    /// Move past an exhausted domain. Returns false at the last domain.
    pub fn advance_domain(&mut self) -> bool {
        let advanced = self.player.advance_domain();
        if advanced {
            log::debug!("Advanced to domain {}", self.player.current_domain());
        }
        advanced
    }

    /// Apply a 0-based answer to `scenario` and mark it complete
    pub fn resolve_choice(&mut self, scenario: &Scenario, chosen_index: usize) -> TurnOutcome {
        let domain = scenario.domain();
        let outcome = if scenario.is_correct(chosen_index) {
            let title_changed = self.player.gain_xp(scenario.xp_reward(), domain);
            let hp_healed = if self.player.hp() < self.player.max_hp() {
                self.player.heal(HEAL_ON_SUCCESS)
            } else {
                0
            };
            TurnOutcome::Success {
                xp_gained: scenario.xp_reward(),
                hp_healed,
                title_changed,
            }
        } else {
            let hp_lost = self.player.take_damage(scenario.hp_penalty(), domain);
            TurnOutcome::Failure {
                chosen_index,
                hp_lost,
            }
        };
        self.player.complete_scenario(scenario.id());
        log::debug!("Scenario {} resolved: {:?}", scenario.id(), outcome);
        outcome
    }

    /// Summary of the session so far, if a player has been named
    pub fn evaluate(&self) -> Option<SessionSummary> {
        if !self.player_named {
            return None;
        }
        let theme = self.themes.current();
        Some(SessionSummary::evaluate(
            &self.player,
            &self.config,
            &theme.key,
            &theme.victory_message,
        ))
    }

    /// Play a full interactive session.
    ///
    /// Returns the summary shown at the end, or `None` when input was
    /// cancelled before the player entered a name.
    pub fn run(&mut self) -> Option<SessionSummary> {
        self.presenter.present(&GameEvent::TitleScreen {
            certification: &self.config,
        });

        self.phase = GamePhase::SelectTheme;
        if !self.select_theme() {
            return self.finish();
        }

        self.phase = GamePhase::Intro;
        self.presenter.present(&GameEvent::Introduction {
            certification: &self.config,
            theme: self.themes.current(),
        });
        self.input
            .wait_for_enter("\n  Press ENTER to begin your journey...");

        self.phase = GamePhase::NameEntry;
        if !self.enter_name() {
            return self.finish();
        }

        self.phase = GamePhase::DomainSelect;
        self.select_starting_domain();

        self.phase = GamePhase::Playing;
        self.play();

        self.finish()
    }

    fn finish(&mut self) -> Option<SessionSummary> {
        self.phase = GamePhase::Ended;
        let summary = self.evaluate()?;
        log::info!(
            "Session ended for '{}': {}/{} correct, {} xp",
            summary.player_name,
            summary.correct_answers,
            summary.total_answers(),
            summary.xp
        );
        self.presenter.present(&GameEvent::Ending {
            summary: &summary,
            theme: self.themes.current(),
        });
        Some(summary)
    }

    fn select_theme(&mut self) -> bool {
        if self.themes.has_multiple() {
            self.presenter.present(&GameEvent::ThemeMenu {
                themes: self.themes.themes(),
            });
            let prompt = format!("  Select theme (1-{}): ", self.themes.theme_count());
            loop {
                let Some(answer) = self.input.read_text(&prompt, false) else {
                    return false;
                };
                let chosen = answer
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .is_some_and(|index| self.themes.set_by_index(index));
                if chosen {
                    break;
                }
                self.presenter.present(&GameEvent::InvalidThemeChoice {
                    theme_count: self.themes.theme_count(),
                });
            }
        }

        self.presenter.present(&GameEvent::ThemeChosen {
            certification: &self.config,
            theme: self.themes.current(),
        });
        true
    }

    fn enter_name(&mut self) -> bool {
        self.presenter.present(&GameEvent::NamePrompt {
            theme: self.themes.current(),
        });
        let Some(name) = self.input.read_text("  > ", false) else {
            return false;
        };
        self.start_player(name);
        self.presenter.present(&GameEvent::Welcome {
            name: &self.player.name,
            theme: self.themes.current(),
        });
        self.input.wait_for_enter(CONTINUE_PROMPT);
        true
    }

    fn select_starting_domain(&mut self) {
        if !self.player.is_playing() {
            return;
        }

        self.presenter.present(&GameEvent::DomainMenu {
            certification: &self.config,
            theme: self.themes.current(),
        });
        let domain_count = self.config.domain_count;
        let prompt = format!("  Select starting domain (1-{} or ENTER): ", domain_count);

        loop {
            let Some(answer) = self.input.read_text(&prompt, true) else {
                self.player.finish();
                return;
            };
            if answer.is_empty() {
                break;
            }
            let target = answer.parse::<u32>().ok();
            match target.and_then(|d| self.jump_to_domain(d).map(|xp| (d, xp))) {
                Some((domain, skipped_xp)) => {
                    if domain > 1 {
                        let domain_name = self.config.domain_name(domain);
                        self.presenter.present(&GameEvent::DomainJump {
                            domain,
                            domain_name: &domain_name,
                            skipped_domains: domain - 1,
                            skipped_xp,
                            theme: self.themes.current(),
                        });
                        self.input.wait_for_enter(CONTINUE_PROMPT);
                    }
                    break;
                }
                None => self
                    .presenter
                    .present(&GameEvent::InvalidDomainChoice { domain_count }),
            }
        }

        self.show_domain_introduction(self.player.current_domain());
    }

    fn show_domain_introduction(&mut self, domain: u32) {
        let theme = self.themes.current();
        let Some(intro) = self
            .config
            .intro_for_domain(domain)
            .and_then(|intro| intro.for_theme(&theme.key))
        else {
            return;
        };
        if intro.introduction.trim().is_empty() {
            return;
        }
        self.presenter.present(&GameEvent::DomainIntroduction {
            domain,
            info: self.config.domain(domain),
            intro,
            theme,
        });
        self.input
            .wait_for_enter("\n  Press ENTER to begin the trials of this domain...");
    }

    fn play(&mut self) {
        while self.player.is_playing() {
            self.presenter.present(&GameEvent::Hud {
                player: &self.player,
                certification: &self.config,
                theme: self.themes.current(),
                redraw: true,
            });

            let Some(scenario) = self.next_scenario() else {
                if !self.advance_domain() {
                    log::debug!("Final domain exhausted");
                    self.player.finish();
                    break;
                }
                let domain = self.player.current_domain();
                let domain_name = self.config.domain_name(domain);
                self.presenter.present(&GameEvent::DomainAdvanced {
                    domain,
                    domain_name: &domain_name,
                    theme: self.themes.current(),
                });
                self.input
                    .wait_for_enter("\n  Press ENTER to enter the next domain...");
                self.show_domain_introduction(domain);
                continue;
            };

            let outcome = self.play_turn(&scenario);
            if outcome == TurnOutcome::Abandoned || !self.player.is_playing() {
                break;
            }
            self.input.wait_for_enter(CONTINUE_PROMPT);
        }
    }

    fn play_turn(&mut self, scenario: &Scenario) -> TurnOutcome {
        loop {
            let content = scenario.themed_content(self.themes.current_key());
            let num_choices = content.choices.len();
            self.presenter.present(&GameEvent::Scenario {
                scenario,
                content,
                theme: self.themes.current(),
            });

            loop {
                match self.input.read_command("  > ", num_choices) {
                    Command::Cancelled => {
                        log::debug!("Input cancelled during scenario {}", scenario.id());
                        self.player.finish();
                        return TurnOutcome::Abandoned;
                    }
                    Command::Quit => {
                        if self.input.confirm("  Abandon your quest? [Y/n] ") {
                            self.player.finish();
                            return TurnOutcome::Abandoned;
                        }
                        self.presenter.present(&GameEvent::Choices { content });
                    }
                    Command::Help => {
                        self.presenter.present(&GameEvent::Help {
                            certification: &self.config,
                        });
                        self.presenter.present(&GameEvent::Choices { content });
                    }
                    Command::Status => {
                        self.presenter.present(&GameEvent::Hud {
                            player: &self.player,
                            certification: &self.config,
                            theme: self.themes.current(),
                            redraw: false,
                        });
                        self.presenter.present(&GameEvent::Choices { content });
                    }
                    Command::ToggleTheme => {
                        self.themes.toggle();
                        self.presenter.present(&GameEvent::Hud {
                            player: &self.player,
                            certification: &self.config,
                            theme: self.themes.current(),
                            redraw: true,
                        });
                        self.presenter.present(&GameEvent::ThemeSwitched {
                            theme: self.themes.current(),
                        });
                        break;
                    }
                    Command::Invalid => {
                        self.presenter
                            .present(&GameEvent::InvalidChoice { num_choices });
                    }
                    Command::Choice(number) => {
                        let outcome = self.resolve_choice(scenario, number - 1);
                        self.report_outcome(scenario, outcome);
                        return outcome;
                    }
                }
            }
        }
    }

    fn report_outcome(&mut self, scenario: &Scenario, outcome: TurnOutcome) {
        let theme = self.themes.current();
        let content = scenario.themed_content(&theme.key);

        match outcome {
            TurnOutcome::Success {
                xp_gained,
                hp_healed,
                title_changed,
            } => {
                let text = if content.success_text.is_empty() {
                    "Correct!"
                } else {
                    content.success_text.as_str()
                };
                self.presenter.present(&GameEvent::Success {
                    text,
                    xp_gained,
                    hp_healed,
                });
                if title_changed {
                    self.presenter.present(&GameEvent::TitleEarned {
                        title: self.player.title(&theme.key),
                        theme,
                    });
                }
            }
            TurnOutcome::Failure {
                chosen_index,
                hp_lost,
            } => {
                self.presenter.present(&GameEvent::Failure {
                    text: scenario.failure_text(&theme.key, chosen_index),
                    hp_lost,
                    reference: scenario.domain_reference(),
                    correct_number: scenario.correct_index() + 1,
                    correct_text: scenario.correct_choice_text(&theme.key),
                });
            }
            TurnOutcome::Abandoned => return,
        }

        self.presenter.present(&GameEvent::TurnFinished {
            player: &self.player,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Choice, ThemedContent, TitleDef};
    use crate::input::ScriptedInput;
    use std::collections::BTreeMap;

    fn scenario(id: &str, domain: u32) -> Scenario {
        let content = ThemedContent {
            title: format!("{} title", id),
            narrative: "A choice awaits.".to_string(),
            choices: vec![Choice::new("Right"), Choice::new("Wrong")],
            success_text: "Well done.".to_string(),
            failure_texts: BTreeMap::new(),
        };
        Scenario::new(id, domain)
            .with_rewards(100, 20)
            .with_generic_failure_text("Study harder.")
            .with_theme("fantasy", content)
    }

    fn config() -> CertificationConfig {
        let mut scenarios = BTreeMap::new();
        scenarios.insert(1, vec![scenario("a", 1), scenario("b", 1)]);
        scenarios.insert(2, vec![scenario("c", 2)]);
        let mut config = CertificationConfig {
            name: "TEST".to_string(),
            domain_count: 2,
            scenarios,
            ..Default::default()
        };
        config.scoring.titles = vec![TitleDef::new(0, "Novice"), TitleDef::new(100, "Adept")];
        config
    }

    fn controller() -> GameController<ScriptedInput, RecordingPresenter> {
        GameController::with_seed(
            config(),
            ScriptedInput::default(),
            RecordingPresenter::new(),
            1,
        )
    }

    #[test]
    fn correct_answer_awards_xp_and_completes() {
        let mut game = controller();
        game.start_player("Ayla");
        let s = game.next_scenario().unwrap();

        let outcome = game.resolve_choice(&s, 0);

        assert_eq!(
            outcome,
            TurnOutcome::Success {
                xp_gained: 100,
                hp_healed: 0,
                title_changed: true
            }
        );
        assert_eq!(game.player().xp(), 100);
        assert!(game.player().has_completed(s.id().as_str()));
    }

    #[test]
    fn correct_answer_heals_when_hurt() {
        let mut game = controller();
        let first = game.next_scenario().unwrap();
        game.resolve_choice(&first, 1);
        let second = game.next_scenario().unwrap();

        let outcome = game.resolve_choice(&second, 0);

        assert!(matches!(outcome, TurnOutcome::Success { hp_healed: 5, .. }));
        assert_eq!(game.player().hp(), 85);
    }

    #[test]
    fn wrong_answer_applies_penalty() {
        let mut game = controller();
        let s = game.next_scenario().unwrap();

        let outcome = game.resolve_choice(&s, 1);

        assert_eq!(
            outcome,
            TurnOutcome::Failure {
                chosen_index: 1,
                hp_lost: 20
            }
        );
        assert_eq!(game.player().hp(), 80);
        assert_eq!(game.player().domain_stats(1).unwrap().wrong, 1);
        assert_eq!(game.player().completed_count(), 1);
    }

    #[test]
    fn exhausted_domain_advances_then_stops() {
        let mut game = controller();
        while let Some(s) = game.next_scenario() {
            game.resolve_choice(&s, 0);
        }
        assert!(game.advance_domain());
        assert_eq!(game.player().current_domain(), 2);
        assert_eq!(game.player().xp(), 200);

        let s = game.next_scenario().unwrap();
        assert_eq!(s.id().as_str(), "c");
        game.resolve_choice(&s, 0);
        assert!(game.next_scenario().is_none());
        assert!(!game.advance_domain());
    }

    #[test]
    fn jump_awards_skip_credit() {
        let mut game = controller();
        assert_eq!(game.jump_to_domain(2), Some(500));
        assert_eq!(game.player().current_domain(), 2);
        assert_eq!(game.jump_to_domain(3), None);
    }

    #[test]
    fn evaluate_requires_named_player() {
        let mut game = controller();
        assert!(game.evaluate().is_none());
        game.start_player("Ayla");
        assert_eq!(game.evaluate().unwrap().player_name, "Ayla");
    }

    #[test]
    fn run_cancelled_before_name_has_no_summary() {
        let mut game = controller();
        assert!(game.run().is_none());
        assert_eq!(game.phase(), GamePhase::Ended);
        assert!(!game.presenter().saw("ending"));
    }
}

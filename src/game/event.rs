//! Events the controller hands to its presenter
//!
//! Events carry data only. Turning them into text is the presenter's job.

use crate::domain::{
    CertificationConfig, DomainInfo, IntroText, Player, Scenario, ThemeDefinition, ThemedContent,
};
use crate::game::ending::SessionSummary;

#[derive(Debug)]
pub enum GameEvent<'a> {
    TitleScreen {
        certification: &'a CertificationConfig,
    },
    ThemeMenu {
        themes: &'a [ThemeDefinition],
    },
    InvalidThemeChoice {
        theme_count: usize,
    },
    ThemeChosen {
        certification: &'a CertificationConfig,
        theme: &'a ThemeDefinition,
    },
    Introduction {
        certification: &'a CertificationConfig,
        theme: &'a ThemeDefinition,
    },
    NamePrompt {
        theme: &'a ThemeDefinition,
    },
    Welcome {
        name: &'a str,
        theme: &'a ThemeDefinition,
    },
    DomainMenu {
        certification: &'a CertificationConfig,
        theme: &'a ThemeDefinition,
    },
    InvalidDomainChoice {
        domain_count: u32,
    },
    /// The player started past domain 1 and was credited for skipped domains
    DomainJump {
        domain: u32,
        domain_name: &'a str,
        skipped_domains: u32,
        skipped_xp: u32,
        theme: &'a ThemeDefinition,
    },
    DomainIntroduction {
        domain: u32,
        info: Option<&'a DomainInfo>,
        intro: &'a IntroText,
        theme: &'a ThemeDefinition,
    },
    DomainAdvanced {
        domain: u32,
        domain_name: &'a str,
        theme: &'a ThemeDefinition,
    },
    Hud {
        player: &'a Player,
        certification: &'a CertificationConfig,
        theme: &'a ThemeDefinition,
        /// Starts a fresh screen rather than answering a status request
        redraw: bool,
    },
    Scenario {
        scenario: &'a Scenario,
        content: &'a ThemedContent,
        theme: &'a ThemeDefinition,
    },
    /// Re-display of the current choices after an informational command
    Choices {
        content: &'a ThemedContent,
    },
    Help {
        certification: &'a CertificationConfig,
    },
    ThemeSwitched {
        theme: &'a ThemeDefinition,
    },
    InvalidChoice {
        num_choices: usize,
    },
    Success {
        text: &'a str,
        xp_gained: u32,
        hp_healed: u32,
    },
    Failure {
        text: &'a str,
        hp_lost: u32,
        reference: &'a str,
        /// 1-based number of the correct choice
        correct_number: usize,
        correct_text: Option<&'a str>,
    },
    TitleEarned {
        title: &'a str,
        theme: &'a ThemeDefinition,
    },
    TurnFinished {
        player: &'a Player,
    },
    Ending {
        summary: &'a SessionSummary,
        theme: &'a ThemeDefinition,
    },
}

impl GameEvent<'_> {
    /// Stable name of the event variant
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::TitleScreen { .. } => "title_screen",
            GameEvent::ThemeMenu { .. } => "theme_menu",
            GameEvent::InvalidThemeChoice { .. } => "invalid_theme_choice",
            GameEvent::ThemeChosen { .. } => "theme_chosen",
            GameEvent::Introduction { .. } => "introduction",
            GameEvent::NamePrompt { .. } => "name_prompt",
            GameEvent::Welcome { .. } => "welcome",
            GameEvent::DomainMenu { .. } => "domain_menu",
            GameEvent::InvalidDomainChoice { .. } => "invalid_domain_choice",
            GameEvent::DomainJump { .. } => "domain_jump",
            GameEvent::DomainIntroduction { .. } => "domain_introduction",
            GameEvent::DomainAdvanced { .. } => "domain_advanced",
            GameEvent::Hud { .. } => "hud",
            GameEvent::Scenario { .. } => "scenario",
            GameEvent::Choices { .. } => "choices",
            GameEvent::Help { .. } => "help",
            GameEvent::ThemeSwitched { .. } => "theme_switched",
            GameEvent::InvalidChoice { .. } => "invalid_choice",
            GameEvent::Success { .. } => "success",
            GameEvent::Failure { .. } => "failure",
            GameEvent::TitleEarned { .. } => "title_earned",
            GameEvent::TurnFinished { .. } => "turn_finished",
            GameEvent::Ending { .. } => "ending",
        }
    }
}

/// Output collaborator of the game controller
pub trait Presenter {
    fn present(&mut self, event: &GameEvent<'_>);
}

/// Presenter that keeps a record of what it was shown
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub kinds: Vec<&'static str>,
    /// Theme key of every scenario display
    pub scenario_themes: Vec<String>,
    pub failure_texts: Vec<String>,
    pub titles_earned: Vec<String>,
    pub summary: Option<SessionSummary>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.kinds.iter().filter(|k| **k == kind).count()
    }

    pub fn saw(&self, kind: &str) -> bool {
        self.count(kind) > 0
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, event: &GameEvent<'_>) {
        self.kinds.push(event.kind());
        match event {
            GameEvent::Scenario { theme, .. } => self.scenario_themes.push(theme.key.clone()),
            GameEvent::Failure { text, .. } => self.failure_texts.push(text.to_string()),
            GameEvent::TitleEarned { title, .. } => self.titles_earned.push(title.to_string()),
            GameEvent::Ending { summary, .. } => self.summary = Some((*summary).clone()),
            _ => {}
        }
    }
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, event: &GameEvent<'_>) {
        (**self).present(event);
    }
}

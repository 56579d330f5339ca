//! Scenario entity - one encounter with a correct choice and themed content

use crate::domain::value_objects::ScenarioId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Theme whose content is used when a scenario lacks the requested theme
pub const DEFAULT_THEME_KEY: &str = "fantasy";

/// Content returned when the scenario has no themed content at all
static EMPTY_CONTENT: LazyLock<ThemedContent> = LazyLock::new(|| ThemedContent {
    title: "SCENARIO".to_string(),
    ..Default::default()
});

/// A single answer option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub text: String,
    /// Explanation shown when this (wrong) option is picked
    pub failure_reason: Option<String>,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure_reason: None,
        }
    }

    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }
}

/// Narrative and choices of a scenario under one theme
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ThemedContent {
    pub title: String,
    pub narrative: String,
    pub choices: Vec<Choice>,
    pub success_text: String,
    /// Failure explanation keyed by 0-based choice index
    pub failure_texts: BTreeMap<usize, String>,
}

impl ThemedContent {
    pub fn choice_texts(&self) -> Vec<&str> {
        self.choices.iter().map(|c| c.text.as_str()).collect()
    }
}

/// Immutable definition of one encounter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    id: ScenarioId,
    domain: u32,
    xp_reward: u32,
    hp_penalty: u32,
    correct_index: usize,
    domain_reference: String,
    generic_failure_text: String,
    themes: BTreeMap<String, ThemedContent>,
}

impl Scenario {
    /// Create a scenario with the default reward (50 xp) and penalty (20 hp)
    pub fn new(id: impl Into<ScenarioId>, domain: u32) -> Self {
        Self {
            id: id.into(),
            domain,
            xp_reward: 50,
            hp_penalty: 20,
            correct_index: 0,
            domain_reference: String::new(),
            generic_failure_text: String::new(),
            themes: BTreeMap::new(),
        }
    }

    pub fn with_rewards(mut self, xp_reward: u32, hp_penalty: u32) -> Self {
        self.xp_reward = xp_reward;
        self.hp_penalty = hp_penalty;
        self
    }

    pub fn with_correct_index(mut self, correct_index: usize) -> Self {
        self.correct_index = correct_index;
        self
    }

    pub fn with_reference(mut self, domain_reference: impl Into<String>) -> Self {
        self.domain_reference = domain_reference.into();
        self
    }

    pub fn with_generic_failure_text(mut self, text: impl Into<String>) -> Self {
        self.generic_failure_text = text.into();
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>, content: ThemedContent) -> Self {
        self.themes.insert(theme.into(), content);
        self
    }

    pub fn id(&self) -> &ScenarioId {
        &self.id
    }

    pub fn domain(&self) -> u32 {
        self.domain
    }

    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    pub fn hp_penalty(&self) -> u32 {
        self.hp_penalty
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn domain_reference(&self) -> &str {
        &self.domain_reference
    }

    pub fn generic_failure_text(&self) -> &str {
        &self.generic_failure_text
    }

    pub fn themes(&self) -> impl Iterator<Item = (&str, &ThemedContent)> {
        self.themes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_correct(&self, chosen_index: usize) -> bool {
        chosen_index == self.correct_index
    }

    /// Content for `theme`.
    ///
    /// Falls back to the default theme, then to the first authored theme,
    /// and only then to an empty block titled `SCENARIO`.
    pub fn themed_content(&self, theme: &str) -> &ThemedContent {
        self.themes
            .get(theme)
            .or_else(|| self.themes.get(DEFAULT_THEME_KEY))
            .or_else(|| self.themes.values().next())
            .unwrap_or(&EMPTY_CONTENT)
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.contains_key(theme)
    }

    /// Explanation for a wrong choice.
    ///
    /// Resolution order: the theme's `failure_texts` entry, the chosen
    /// choice's own `failure_reason`, then the scenario-level generic text.
    pub fn failure_text(&self, theme: &str, chosen_index: usize) -> &str {
        let content = self.themed_content(theme);

        if let Some(text) = content.failure_texts.get(&chosen_index) {
            return text;
        }

        if let Some(reason) = content
            .choices
            .get(chosen_index)
            .and_then(|choice| choice.failure_reason.as_deref())
            .filter(|reason| !reason.is_empty())
        {
            return reason;
        }

        &self.generic_failure_text
    }

    /// Text of the correct choice under `theme`, if the content has it
    pub fn correct_choice_text(&self, theme: &str) -> Option<&str> {
        self.themed_content(theme)
            .choices
            .get(self.correct_index)
            .map(|choice| choice.text.as_str())
    }
}

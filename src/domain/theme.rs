//! Story themes and the manager that tracks the active one
//!
//! A certification declares any number of themes in its presentation
//! config. When it declares none, the built-in fantasy/corporate pair is
//! installed instead. Themes are fixed after construction; only the active
//! index changes.

use serde::{Deserialize, Serialize};

/// Narration register used for the game's own messages (domain transitions,
/// promotions, endings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Fantasy,
    Corporate,
}

impl Voice {
    /// Voice implied by a theme key when none is declared
    pub fn for_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("corporate") {
            Voice::Corporate
        } else {
            Voice::Fantasy
        }
    }
}

/// Presentation metadata for one theme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeDefinition {
    pub key: String,
    pub display_name: String,
    pub short_name: String,
    pub description: String,
    pub game_title: String,
    /// How the game addresses the player (e.g. "Seeker", "Employee")
    pub player_term: String,
    pub narrator: String,
    pub victory_message: String,
    pub voice: Voice,
}

impl ThemeDefinition {
    /// A theme with every display string derived from its key
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let title = title_case(&key);
        Self {
            voice: Voice::for_key(&key),
            display_name: title.clone(),
            short_name: title,
            description: String::new(),
            game_title: String::new(),
            player_term: "Player".to_string(),
            narrator: "NARRATOR".to_string(),
            victory_message: "Congratulations!".to_string(),
            key,
        }
    }

    /// The built-in pair used when a certification declares no themes
    pub fn builtin() -> Vec<ThemeDefinition> {
        vec![
            ThemeDefinition {
                display_name: "Medieval Fantasy".to_string(),
                short_name: "Fantasy".to_string(),
                description: "Explore an ancient realm where knowledge is guarded by scribes \
                              and magic protects the secrets..."
                    .to_string(),
                player_term: "Seeker".to_string(),
                narrator: "THE CHRONICLER".to_string(),
                victory_message: "The realm honors your mastery.".to_string(),
                ..ThemeDefinition::new("fantasy")
            },
            ThemeDefinition {
                display_name: "Corporate Office".to_string(),
                short_name: "Corporate".to_string(),
                description: "Navigate challenges in the corporate world, where policies meet \
                              reality and coffee fuels compliance..."
                    .to_string(),
                player_term: "Employee".to_string(),
                narrator: "HR DEPARTMENT".to_string(),
                victory_message: "Your certificate is on its way to your inbox.".to_string(),
                ..ThemeDefinition::new("corporate")
            },
        ]
    }
}

fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tracks the active theme among the configured ones
#[derive(Debug, Clone)]
pub struct ThemeManager {
    themes: Vec<ThemeDefinition>,
    current_index: usize,
}

impl ThemeManager {
    /// Create a manager over `declared`, or over `fallback` when nothing
    /// is declared
    pub fn with_fallback(declared: Vec<ThemeDefinition>, fallback: Vec<ThemeDefinition>) -> Self {
        let themes = if declared.is_empty() {
            log::debug!("No themes declared, installing {} built-in themes", fallback.len());
            fallback
        } else {
            declared
        };
        let themes = if themes.is_empty() {
            ThemeDefinition::builtin()
        } else {
            themes
        };

        Self {
            themes,
            current_index: 0,
        }
    }

    /// Create a manager over `declared`, falling back to the built-in pair
    pub fn new(declared: Vec<ThemeDefinition>) -> Self {
        Self::with_fallback(declared, ThemeDefinition::builtin())
    }

    pub fn current(&self) -> &ThemeDefinition {
        &self.themes[self.current_index]
    }

    pub fn current_key(&self) -> &str {
        &self.current().key
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn voice(&self) -> Voice {
        self.current().voice
    }

    pub fn themes(&self) -> &[ThemeDefinition] {
        &self.themes
    }

    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    pub fn has_multiple(&self) -> bool {
        self.themes.len() > 1
    }

    /// Advance to the next theme, wrapping around. Returns the new key.
    pub fn toggle(&mut self) -> &str {
        self.current_index = (self.current_index + 1) % self.themes.len();
        log::debug!("Theme switched to '{}'", self.current_key());
        self.current_key()
    }

    pub fn set_by_key(&mut self, key: &str) -> bool {
        match self.themes.iter().position(|t| t.key == key) {
            Some(index) => {
                self.current_index = index;
                true
            }
            None => false,
        }
    }

    pub fn set_by_index(&mut self, index: usize) -> bool {
        if index < self.themes.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_themes() -> ThemeManager {
        ThemeManager::new(vec![
            ThemeDefinition::new("fantasy"),
            ThemeDefinition::new("corporate"),
            ThemeDefinition::new("space_opera"),
        ])
    }

    #[test]
    fn empty_declaration_installs_builtin_pair() {
        let manager = ThemeManager::new(Vec::new());

        assert_eq!(manager.theme_count(), 2);
        assert_eq!(manager.current_key(), "fantasy");
        assert_eq!(manager.themes()[1].voice, Voice::Corporate);
        assert_ne!(manager.themes()[0].narrator, manager.themes()[1].narrator);
    }

    #[test]
    fn declared_themes_keep_declaration_order() {
        let manager = three_themes();
        let keys: Vec<&str> = manager.themes().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["fantasy", "corporate", "space_opera"]);
        assert_eq!(manager.themes()[2].display_name, "Space Opera");
    }

    #[test]
    fn toggle_wraps_around() {
        let mut manager = three_themes();
        assert_eq!(manager.toggle(), "corporate");
        assert_eq!(manager.toggle(), "space_opera");
        assert_eq!(manager.toggle(), "fantasy");
    }

    #[test]
    fn toggling_theme_count_times_returns_to_start() {
        let mut manager = three_themes();
        manager.set_by_index(1);
        let start = manager.current_key().to_string();

        for _ in 0..manager.theme_count() {
            manager.toggle();
        }

        assert_eq!(manager.current_key(), start);
    }

    #[test]
    fn single_theme_toggle_is_stable() {
        let mut manager = ThemeManager::new(vec![ThemeDefinition::new("noir")]);
        assert!(!manager.has_multiple());
        assert_eq!(manager.toggle(), "noir");
    }

    #[test]
    fn set_by_key_and_index() {
        let mut manager = three_themes();

        assert!(manager.set_by_key("space_opera"));
        assert_eq!(manager.current_index(), 2);

        assert!(!manager.set_by_key("western"));
        assert_eq!(manager.current_key(), "space_opera");

        assert!(manager.set_by_index(0));
        assert!(!manager.set_by_index(3));
        assert_eq!(manager.current_key(), "fantasy");
    }

    #[test]
    fn voice_is_derived_from_key() {
        assert_eq!(Voice::for_key("corporate"), Voice::Corporate);
        assert_eq!(Voice::for_key("Corporate"), Voice::Corporate);
        assert_eq!(Voice::for_key("pirates"), Voice::Fantasy);
    }

    #[test]
    fn injected_fallback_is_used_when_nothing_declared() {
        let manager =
            ThemeManager::with_fallback(Vec::new(), vec![ThemeDefinition::new("minimal")]);
        assert_eq!(manager.theme_count(), 1);
        assert_eq!(manager.current_key(), "minimal");
    }
}

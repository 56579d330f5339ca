//! Certification configuration as seen by the game core
//!
//! The content loader resolves a certification pack into one
//! [`CertificationConfig`]. Everything here is already normalized: the core
//! never sees raw YAML shapes.

use crate::domain::scenario::{DEFAULT_THEME_KEY, Scenario};
use crate::domain::theme::ThemeDefinition;
use crate::domain::value_objects::CertificationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fully-resolved certification pack
#[derive(Debug, Clone, Default)]
pub struct CertificationConfig {
    pub id: CertificationId,
    pub name: String,
    pub full_name: String,
    pub organization: String,
    pub domain_count: u32,
    pub domains: Vec<DomainInfo>,
    /// Authored scenarios per domain, in file order
    pub scenarios: BTreeMap<u32, Vec<Scenario>>,
    /// Declared themes in declaration order (may be empty)
    pub themes: Vec<ThemeDefinition>,
    pub scoring: Scoring,
    pub intros: BTreeMap<u32, DomainIntro>,
}

impl CertificationConfig {
    pub fn domain(&self, domain_id: u32) -> Option<&DomainInfo> {
        self.domains.iter().find(|d| d.id == domain_id)
    }

    /// Domain name, or `Domain N` when the domain is not declared
    pub fn domain_name(&self, domain_id: u32) -> String {
        self.domain(domain_id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("Domain {}", domain_id))
    }

    pub fn domain_short_name(&self, domain_id: u32) -> String {
        self.domain(domain_id)
            .map(|d| d.short_name().to_string())
            .unwrap_or_else(|| format!("Domain {}", domain_id))
    }

    pub fn scenarios_for_domain(&self, domain_id: u32) -> &[Scenario] {
        self.scenarios
            .get(&domain_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn intro_for_domain(&self, domain_id: u32) -> Option<&DomainIntro> {
        self.intros.get(&domain_id)
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.values().map(Vec::len).sum()
    }
}

/// One knowledge area of the certification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainInfo {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub themes: BTreeMap<String, DomainThemeContent>,
}

impl DomainInfo {
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// Banner title for the theme, falling back to the default theme and
    /// then to the plain domain name
    pub fn themed_title(&self, theme: &str) -> &str {
        self.themes
            .get(theme)
            .or_else(|| self.themes.get(DEFAULT_THEME_KEY))
            .and_then(|content| content.title.as_deref())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainThemeContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Introduction shown when a player enters a domain
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomainIntro {
    pub themed: BTreeMap<String, IntroText>,
    /// Theme-less introduction used when the active theme has none
    pub fallback: Option<IntroText>,
}

impl DomainIntro {
    pub fn for_theme(&self, theme: &str) -> Option<&IntroText> {
        self.themed.get(theme).or(self.fallback.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroText {
    #[serde(default)]
    pub introduction: String,
    #[serde(default = "default_narrator")]
    pub narrator: String,
}

fn default_narrator() -> String {
    "NARRATOR".to_string()
}

/// Scoring parameters of a certification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub starting_hp: i32,
    pub max_hp: i32,
    pub scenarios_per_domain: u32,
    pub xp_per_correct: u32,
    pub titles: Vec<TitleDef>,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            starting_hp: 100,
            max_hp: 100,
            scenarios_per_domain: 10,
            xp_per_correct: 50,
            titles: Vec::new(),
        }
    }
}

impl Scoring {
    /// Xp a full domain is worth
    pub fn xp_per_domain(&self) -> u32 {
        self.scenarios_per_domain.saturating_mul(self.xp_per_correct)
    }

    pub fn max_xp(&self, domain_count: u32) -> u32 {
        domain_count.saturating_mul(self.xp_per_domain())
    }
}

/// A title tier: reached once cumulative xp meets `threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDef {
    #[serde(default)]
    pub threshold: u32,
    /// Display name per theme key, plus an optional plain `title` entry
    #[serde(flatten)]
    pub names: BTreeMap<String, String>,
}

impl TitleDef {
    pub fn new(threshold: u32, name: impl Into<String>) -> Self {
        let mut names = BTreeMap::new();
        names.insert("title".to_string(), name.into());
        Self { threshold, names }
    }

    pub fn with_theme(mut self, theme: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(theme.into(), name.into());
        self
    }

    pub fn name_for(&self, theme: &str) -> &str {
        self.names
            .get(theme)
            .or_else(|| self.names.get(DEFAULT_THEME_KEY))
            .or_else(|| self.names.get("title"))
            .map(String::as_str)
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_name_falls_back_to_default_theme_then_plain_title() {
        let tier = TitleDef::new(100, "Adept").with_theme("fantasy", "Apprentice Scribe");

        assert_eq!(tier.name_for("fantasy"), "Apprentice Scribe");
        assert_eq!(tier.name_for("corporate"), "Apprentice Scribe");

        let plain = TitleDef::new(0, "Novice");
        assert_eq!(plain.name_for("corporate"), "Novice");

        let empty = TitleDef {
            threshold: 0,
            names: BTreeMap::new(),
        };
        assert_eq!(empty.name_for("fantasy"), "Unknown");
    }

    #[test]
    fn scoring_defaults_and_max_xp() {
        let scoring = Scoring::default();
        assert_eq!(scoring.starting_hp, 100);
        assert_eq!(scoring.xp_per_domain(), 500);
        assert_eq!(scoring.max_xp(8), 4000);
    }

    #[test]
    fn scoring_deserializes_with_partial_fields() {
        let yaml = "xp_per_correct: 25\ntitles:\n  - threshold: 0\n    fantasy: Squire\n    corporate: Intern\n";
        let scoring: Scoring = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(scoring.xp_per_correct, 25);
        assert_eq!(scoring.scenarios_per_domain, 10);
        assert_eq!(scoring.titles[0].name_for("corporate"), "Intern");
    }

    #[test]
    fn domain_lookup_falls_back_to_generic_name() {
        let config = CertificationConfig {
            domain_count: 2,
            domains: vec![DomainInfo {
                id: 1,
                name: "Security and Risk Management".to_string(),
                short_name: Some("Risk Mgmt".to_string()),
                themes: BTreeMap::new(),
            }],
            ..Default::default()
        };

        assert_eq!(config.domain_short_name(1), "Risk Mgmt");
        assert_eq!(config.domain_name(2), "Domain 2");
        assert!(config.scenarios_for_domain(1).is_empty());
    }

    #[test]
    fn intro_prefers_theme_block() {
        let mut intro = DomainIntro::default();
        intro.themed.insert(
            "corporate".to_string(),
            IntroText {
                introduction: "Welcome to onboarding.".to_string(),
                narrator: "HR".to_string(),
            },
        );
        intro.fallback = Some(IntroText {
            introduction: "The gates open.".to_string(),
            narrator: "NARRATOR".to_string(),
        });

        assert_eq!(intro.for_theme("corporate").unwrap().narrator, "HR");
        assert_eq!(
            intro.for_theme("fantasy").unwrap().introduction,
            "The gates open."
        );
    }
}

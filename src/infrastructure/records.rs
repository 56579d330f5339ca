//! Raw YAML records of a certification pack and their normalization
//!
//! Pack files allow several shapes for the same thing (plain or detailed
//! choices, numeric or string keys, themed or theme-less intros). The
//! records here accept all of them; the `into_*` conversions produce the
//! canonical domain types and reject content the game cannot play.

use crate::domain::{
    CertificationConfig, CertificationId, Choice, ContentError, DomainInfo, DomainIntro, IntroText,
    Scenario, Scoring, ThemeDefinition, ThemedContent, Voice,
};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// `config.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigRecord {
    pub certification: CertificationRecord,
    pub domains: DomainsRecord,
    pub presentation: PresentationRecord,
    pub scoring: Scoring,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CertificationRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub organization: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DomainsRecord {
    pub count: u32,
    pub list: Vec<DomainInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PresentationRecord {
    pub themes: ThemeList,
}

/// Declared themes in file order
#[derive(Debug, Clone, Default)]
pub struct ThemeList(pub Vec<(String, ThemeRecord)>);

impl<'de> Deserialize<'de> for ThemeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ThemeListVisitor;

        impl<'de> Visitor<'de> for ThemeListVisitor {
            type Value = ThemeList;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of theme key to theme settings")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ThemeList::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut themes = Vec::new();
                while let Some((key, record)) = map.next_entry::<String, Option<ThemeRecord>>()? {
                    themes.push((key, record.unwrap_or_default()));
                }
                Ok(ThemeList(themes))
            }
        }

        deserializer.deserialize_map(ThemeListVisitor)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeRecord {
    pub display_name: Option<String>,
    pub short_name: Option<String>,
    pub description: String,
    pub game_title: String,
    pub player_term: Option<String>,
    pub narrator: Option<String>,
    pub victory_message: String,
    pub voice: Option<Voice>,
}

impl ThemeRecord {
    fn into_theme(self, key: String) -> ThemeDefinition {
        let base = ThemeDefinition::new(key);
        let display_name = self
            .display_name
            .or_else(|| (!self.game_title.is_empty()).then(|| self.game_title.clone()))
            .unwrap_or(base.display_name.clone());

        ThemeDefinition {
            display_name,
            short_name: self.short_name.unwrap_or(base.short_name.clone()),
            description: self.description,
            game_title: self.game_title,
            player_term: self.player_term.unwrap_or(base.player_term.clone()),
            narrator: self.narrator.unwrap_or(base.narrator.clone()),
            // Left empty so the ending can name the certification instead
            victory_message: self.victory_message,
            voice: self.voice.unwrap_or(base.voice),
            ..base
        }
    }
}

/// A map key written either as a number or as a numeric string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum NumericKey {
    Number(u64),
    Text(String),
}

impl NumericKey {
    pub fn as_number(&self) -> Option<u64> {
        match self {
            NumericKey::Number(n) => Some(*n),
            NumericKey::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumericKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericKey::Number(n) => write!(f, "{}", n),
            NumericKey::Text(text) => f.write_str(text),
        }
    }
}

/// A scenario file (`domain_N.yaml`, `all.yaml` or `scenarios.yaml`).
///
/// Entries stay raw until normalization so that one malformed record does
/// not take its siblings down with it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub scenarios: Vec<serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioRecord {
    pub id: Option<String>,
    pub domain: Option<u32>,
    pub xp_reward: Option<u32>,
    pub hp_penalty: Option<u32>,
    pub correct_index: Option<i64>,
    /// Generic failure explanation
    pub failure_text: String,
    pub domain_reference: String,
    pub themes: BTreeMap<String, ThemedRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemedRecord {
    pub title: Option<String>,
    pub narrative: String,
    pub choices: Vec<ChoiceRecord>,
    pub success_text: String,
    pub failure_texts: BTreeMap<NumericKey, String>,
}

/// A choice written as a plain scalar or as `{text, failure_reason}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChoiceRecord {
    Text(String),
    /// Unquoted numbers such as port lists (`- 443`)
    Number(serde_yaml::Number),
    Bool(bool),
    Detailed {
        text: String,
        #[serde(default)]
        failure_reason: Option<String>,
    },
}

impl From<ChoiceRecord> for Choice {
    fn from(record: ChoiceRecord) -> Self {
        match record {
            ChoiceRecord::Text(text) => Choice::new(text),
            ChoiceRecord::Number(number) => Choice::new(number.to_string()),
            ChoiceRecord::Bool(flag) => Choice::new(flag.to_string()),
            ChoiceRecord::Detailed {
                text,
                failure_reason,
            } => Choice {
                text,
                failure_reason: failure_reason.filter(|reason| !reason.trim().is_empty()),
            },
        }
    }
}

impl ThemedRecord {
    fn into_content(self, scenario_id: &str) -> ThemedContent {
        let mut failure_texts = BTreeMap::new();
        for (key, text) in self.failure_texts {
            match key.as_number().and_then(|n| usize::try_from(n).ok()) {
                Some(index) => {
                    failure_texts.insert(index, text);
                }
                None => log::warn!(
                    "Scenario {}: ignoring failure text with non-numeric key '{}'",
                    scenario_id,
                    key
                ),
            }
        }

        ThemedContent {
            title: self.title.unwrap_or_else(|| "SCENARIO".to_string()),
            narrative: self.narrative,
            choices: self.choices.into_iter().map(Choice::from).collect(),
            success_text: self.success_text,
            failure_texts,
        }
    }
}

impl ScenarioRecord {
    /// Normalize into a playable scenario filed under `domain`.
    ///
    /// `fallback_id` is used when the record has no id. Fails when the
    /// scenario has no themed content, a theme without choices, or a correct
    /// index outside any theme's choice list.
    pub fn into_scenario(self, domain: u32, fallback_id: &str) -> Result<Scenario, ContentError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| fallback_id.to_string());

        if self.themes.is_empty() {
            return Err(ContentError::invalid_scenario(id, "no themed content"));
        }

        let correct_index = self.correct_index.unwrap_or(0);
        let correct_index = usize::try_from(correct_index).map_err(|_| {
            ContentError::invalid_scenario(
                id.as_str(),
                format!("correct_index {} is negative", correct_index),
            )
        })?;

        let mut scenario = Scenario::new(id.as_str(), domain)
            .with_rewards(self.xp_reward.unwrap_or(50), self.hp_penalty.unwrap_or(20))
            .with_correct_index(correct_index)
            .with_reference(self.domain_reference)
            .with_generic_failure_text(self.failure_text);

        for (theme, record) in self.themes {
            let content = record.into_content(&id);
            if content.choices.is_empty() {
                return Err(ContentError::invalid_scenario(
                    id.as_str(),
                    format!("theme '{}' has no choices", theme),
                ));
            }
            if correct_index >= content.choices.len() {
                return Err(ContentError::invalid_scenario(
                    id.as_str(),
                    format!(
                        "correct_index {} out of range for {} choices in theme '{}'",
                        correct_index,
                        content.choices.len(),
                        theme
                    ),
                ));
            }
            scenario = scenario.with_theme(theme, content);
        }

        Ok(scenario)
    }
}

/// `intros.yaml`: domain number to introduction block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IntrosFile(pub BTreeMap<NumericKey, Option<IntroRecord>>);

/// Either `{introduction, narrator}` or a map of theme key to that shape
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IntroRecord(pub BTreeMap<String, serde_yaml::Value>);

impl IntroRecord {
    fn into_intro(self, domain: u32) -> DomainIntro {
        let mut fields = self.0;
        let fallback = if fields.contains_key("introduction") {
            let text = |value: Option<serde_yaml::Value>| {
                value
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            };
            let introduction = text(fields.remove("introduction"));
            let narrator = fields
                .remove("narrator")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "NARRATOR".to_string());
            Some(IntroText {
                introduction,
                narrator,
            })
        } else {
            None
        };

        let mut themed = BTreeMap::new();
        for (theme, value) in fields {
            match serde_yaml::from_value::<IntroText>(value) {
                Ok(intro) => {
                    themed.insert(theme, intro);
                }
                Err(e) => log::warn!(
                    "Domain {} intro: ignoring malformed '{}' block: {}",
                    domain,
                    theme,
                    e
                ),
            }
        }

        DomainIntro { themed, fallback }
    }
}

impl IntrosFile {
    pub fn into_intros(self) -> BTreeMap<u32, DomainIntro> {
        let mut intros = BTreeMap::new();
        for (key, record) in self.0 {
            let Some(domain) = key.as_number().and_then(|n| u32::try_from(n).ok()) else {
                log::warn!("Ignoring intro for non-numeric domain key '{}'", key);
                continue;
            };
            if let Some(record) = record {
                intros.insert(domain, record.into_intro(domain));
            }
        }
        intros
    }
}

/// Scenario files as read from disk, before normalization
#[derive(Debug, Clone, Default)]
pub struct ScenarioSources {
    /// `domain_N.yaml` contents; entries are filed under N
    pub numbered: BTreeMap<u32, ScenarioFile>,
    /// `all.yaml` / `scenarios.yaml` by file name; entries filed by their
    /// `domain` field
    pub collections: Vec<(String, ScenarioFile)>,
}

/// One raw entry with where it came from
struct SourceEntry {
    file: String,
    position: usize,
    /// Domain imposed by a numbered file
    domain: Option<u32>,
    value: serde_yaml::Value,
}

impl ScenarioSources {
    /// Normalize every record.
    ///
    /// Malformed, invalid and duplicate records are skipped with a warning,
    /// as are records filed outside `1..=domain_count`. Scenarios lacking
    /// content for one of `declared_themes` are kept but reported.
    pub fn into_scenarios(
        self,
        domain_count: u32,
        declared_themes: &[String],
    ) -> BTreeMap<u32, Vec<Scenario>> {
        let mut scenarios: BTreeMap<u32, Vec<Scenario>> = BTreeMap::new();
        let mut seen = HashSet::new();

        let numbered = self.numbered.into_iter().flat_map(|(domain, file)| {
            let name = format!("domain_{}.yaml", domain);
            file.scenarios
                .into_iter()
                .enumerate()
                .map(move |(i, value)| SourceEntry {
                    file: name.clone(),
                    position: i + 1,
                    domain: Some(domain),
                    value,
                })
        });
        let collected = self.collections.into_iter().flat_map(|(name, file)| {
            file.scenarios
                .into_iter()
                .enumerate()
                .map(move |(i, value)| SourceEntry {
                    file: name.clone(),
                    position: i + 1,
                    domain: None,
                    value,
                })
        });

        for entry in numbered.chain(collected) {
            let record = match serde_yaml::from_value::<ScenarioRecord>(entry.value) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!(
                        "Skipping malformed scenario #{} in {}: {}",
                        entry.position,
                        entry.file,
                        e
                    );
                    continue;
                }
            };

            let domain = entry.domain.unwrap_or(record.domain.unwrap_or(1));
            if domain == 0 || domain > domain_count {
                log::warn!(
                    "Skipping scenario #{} in {}: domain {} is outside 1..={}",
                    entry.position,
                    entry.file,
                    domain,
                    domain_count
                );
                continue;
            }

            let position = scenarios.get(&domain).map(Vec::len).unwrap_or(0) + 1;
            let fallback_id = format!("domain{}_{}", domain, position);
            let scenario = match record.into_scenario(domain, &fallback_id) {
                Ok(scenario) => scenario,
                Err(e) => {
                    log::warn!("Skipping scenario in {}: {}", entry.file, e);
                    continue;
                }
            };
            if !seen.insert(scenario.id().clone()) {
                log::warn!("Skipping duplicate scenario id '{}'", scenario.id());
                continue;
            }

            let missing: Vec<&str> = declared_themes
                .iter()
                .map(String::as_str)
                .filter(|theme| !scenario.has_theme(theme))
                .collect();
            if !missing.is_empty() {
                log::warn!(
                    "Scenario '{}' has no content for theme(s) {}; fallback content will be shown",
                    scenario.id(),
                    missing.join(", ")
                );
            }

            scenarios.entry(domain).or_default().push(scenario);
        }

        scenarios
    }
}

impl ConfigRecord {
    /// Id, display name and full name, defaulted from the pack directory name
    pub fn identity(&self, dir_name: &str) -> (CertificationId, String, String) {
        let cert = &self.certification;
        let id = cert.id.clone().unwrap_or_else(|| dir_name.to_string());
        let name = cert.name.clone().unwrap_or_else(|| dir_name.to_uppercase());
        let full_name = cert.full_name.clone().unwrap_or_else(|| name.clone());
        (CertificationId::new(id), name, full_name)
    }

    /// Keys of the declared themes, in declaration order
    pub fn theme_keys(&self) -> Vec<String> {
        self.presentation
            .themes
            .0
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn into_config(
        self,
        dir_name: &str,
        scenarios: BTreeMap<u32, Vec<Scenario>>,
        intros: BTreeMap<u32, DomainIntro>,
    ) -> CertificationConfig {
        let (id, name, full_name) = self.identity(dir_name);
        let themes = self
            .presentation
            .themes
            .0
            .into_iter()
            .map(|(key, record)| record.into_theme(key))
            .collect();

        CertificationConfig {
            id,
            name,
            full_name,
            organization: self.certification.organization,
            domain_count: self.domains.count,
            domains: self.domains.list,
            scenarios,
            themes,
            scoring: self.scoring,
            intros,
        }
    }
}

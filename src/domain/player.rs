//! Player progression state
//!
//! The player record is created once per session from the certification's
//! scoring parameters and mutated only by the game controller.

use crate::domain::config::{CertificationConfig, TitleDef};
use crate::domain::value_objects::ScenarioId;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Title used while xp is below every configured threshold
pub const BASE_TITLE: &str = "Novice";

/// Whether the session is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Playing,
    /// All domains done, or the player quit early
    Victory,
}

/// Banded classification of overall accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PerformanceRating {
    NeedsImprovement,
    Developing,
    Competent,
    Proficient,
    Exemplary,
}

impl PerformanceRating {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Self::Exemplary
        } else if accuracy >= 80.0 {
            Self::Proficient
        } else if accuracy >= 70.0 {
            Self::Competent
        } else if accuracy >= 60.0 {
            Self::Developing
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exemplary => "Exemplary",
            Self::Proficient => "Proficient",
            Self::Competent => "Competent",
            Self::Developing => "Developing",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correct/wrong tally for one domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainStats {
    pub correct: u32,
    pub wrong: u32,
}

impl DomainStats {
    pub fn attempts(&self) -> u32 {
        self.correct + self.wrong
    }

    pub fn accuracy(&self) -> f64 {
        percentage(self.correct, self.attempts())
    }
}

fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) / f64::from(total) * 100.0
}

/// The player's mutable progression record
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub name: String,
    hp: i32,
    max_hp: i32,
    xp: u32,
    max_xp: u32,
    current_domain: u32,
    domain_count: u32,
    scenarios_completed: HashSet<ScenarioId>,
    correct_answers: u32,
    wrong_answers: u32,
    domain_stats: BTreeMap<u32, DomainStats>,
    /// Title tiers sorted by ascending threshold
    #[serde(skip)]
    titles: Vec<TitleDef>,
}

impl Player {
    /// Create a player at domain 1 with zeroed statistics.
    ///
    /// A starting hp above `max_hp` is clamped so that `hp <= max_hp` holds
    /// from the start.
    pub fn new(
        name: impl Into<String>,
        starting_hp: i32,
        max_hp: i32,
        domain_count: u32,
        max_xp: u32,
        titles: Vec<TitleDef>,
    ) -> Self {
        let mut titles = titles;
        titles.sort_by_key(|t| t.threshold);

        Self {
            name: name.into(),
            hp: starting_hp.min(max_hp),
            max_hp,
            xp: 0,
            max_xp,
            current_domain: 1,
            domain_count,
            scenarios_completed: HashSet::new(),
            correct_answers: 0,
            wrong_answers: 0,
            domain_stats: (1..=domain_count)
                .map(|d| (d, DomainStats::default()))
                .collect(),
            titles,
        }
    }

    /// Create a player from a certification's scoring parameters
    pub fn from_certification(name: impl Into<String>, config: &CertificationConfig) -> Self {
        let scoring = &config.scoring;
        Self::new(
            name,
            scoring.starting_hp,
            scoring.max_hp,
            config.domain_count,
            scoring.max_xp(config.domain_count),
            scoring.titles.clone(),
        )
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn max_xp(&self) -> u32 {
        self.max_xp
    }

    pub fn current_domain(&self) -> u32 {
        self.current_domain
    }

    pub fn domain_count(&self) -> u32 {
        self.domain_count
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    pub fn domain_stats(&self, domain: u32) -> Option<DomainStats> {
        self.domain_stats.get(&domain).copied()
    }

    pub fn all_domain_stats(&self) -> &BTreeMap<u32, DomainStats> {
        &self.domain_stats
    }

    pub fn completed_count(&self) -> usize {
        self.scenarios_completed.len()
    }

    pub fn has_completed(&self, id: &str) -> bool {
        self.scenarios_completed.contains(id)
    }

    /// Subtract `amount` from hp; hp may go negative.
    ///
    /// Returns the amount subtracted.
    pub fn take_damage(&mut self, amount: u32, domain: u32) -> u32 {
        self.hp = self.hp.saturating_sub_unsigned(amount);
        self.wrong_answers += 1;
        if let Some(stats) = self.domain_stats.get_mut(&domain) {
            stats.wrong += 1;
        }
        amount
    }

    /// Add xp for a correct answer. Returns true when the title changed.
    pub fn gain_xp(&mut self, amount: u32, domain: u32) -> bool {
        let old_tier = self.title_tier();
        self.xp = self.xp.saturating_add(amount);
        self.correct_answers += 1;
        if let Some(stats) = self.domain_stats.get_mut(&domain) {
            stats.correct += 1;
        }
        old_tier != self.title_tier()
    }

    /// Restore hp up to `max_hp`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.hp >= self.max_hp {
            return 0;
        }
        let missing = self.max_hp.abs_diff(self.hp);
        let healed = missing.min(amount);
        self.hp = self.hp.saturating_add_unsigned(healed);
        healed
    }

    pub fn complete_scenario(&mut self, id: &ScenarioId) {
        if !self.scenarios_completed.contains(id) {
            self.scenarios_completed.insert(id.clone());
        }
    }

    /// Move to the next domain. Returns false when already at the last one.
    pub fn advance_domain(&mut self) -> bool {
        if self.current_domain < self.domain_count {
            self.current_domain += 1;
            true
        } else {
            false
        }
    }

    /// Start the session at `target` instead of domain 1.
    ///
    /// Credits `xp_per_domain` for every skipped domain and returns the xp
    /// awarded, or `None` when `target` is not a valid domain.
    pub fn jump_to_domain(&mut self, target: u32, xp_per_domain: u32) -> Option<u32> {
        if target == 0 || target > self.domain_count {
            return None;
        }
        let skipped_xp = (target - 1).saturating_mul(xp_per_domain);
        self.current_domain = target;
        self.xp = self.xp.saturating_add(skipped_xp);
        Some(skipped_xp)
    }

    /// Jump to the victory sentinel, ending the session
    pub fn finish(&mut self) {
        self.current_domain = self.domain_count + 1;
    }

    /// Number of title tiers reached at the current xp
    fn title_tier(&self) -> usize {
        self.titles
            .iter()
            .take_while(|tier| tier.threshold <= self.xp)
            .count()
    }

    /// Title for the current xp under `theme`
    pub fn title(&self, theme: &str) -> &str {
        self.titles
            .iter()
            .take_while(|tier| tier.threshold <= self.xp)
            .last()
            .map(|tier| tier.name_for(theme))
            .unwrap_or(BASE_TITLE)
    }

    pub fn status(&self) -> GameStatus {
        if self.current_domain > self.domain_count {
            GameStatus::Victory
        } else {
            GameStatus::Playing
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status() == GameStatus::Playing
    }

    /// Overall accuracy in percent, 0 before any answer
    pub fn accuracy(&self) -> f64 {
        percentage(
            self.correct_answers,
            self.correct_answers + self.wrong_answers,
        )
    }

    pub fn domain_accuracy(&self, domain: u32) -> f64 {
        self.domain_stats
            .get(&domain)
            .map(DomainStats::accuracy)
            .unwrap_or(0.0)
    }

    pub fn performance_rating(&self) -> PerformanceRating {
        PerformanceRating::from_accuracy(self.accuracy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("Ayla", 100, 100, 3, 1500, Vec::new())
    }

    fn titled_player() -> Player {
        Player::new(
            "Ayla",
            100,
            100,
            3,
            1500,
            vec![TitleDef::new(100, "Adept"), TitleDef::new(0, "Novice")],
        )
    }

    #[test]
    fn new_player_tracks_every_domain() {
        let p = player();
        let keys: Vec<u32> = p.all_domain_stats().keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(p.current_domain(), 1);
        assert_eq!(p.status(), GameStatus::Playing);
    }

    #[test]
    fn starting_hp_is_clamped_to_max() {
        let p = Player::new("Ayla", 150, 100, 1, 100, Vec::new());
        assert_eq!(p.hp(), 100);
    }

    #[test]
    fn take_damage_updates_counters() {
        let mut p = player();
        let taken = p.take_damage(20, 1);

        assert_eq!(taken, 20);
        assert_eq!(p.hp(), 80);
        assert_eq!(p.wrong_answers(), 1);
        assert_eq!(p.domain_stats(1).unwrap().wrong, 1);
    }

    #[test]
    fn take_damage_can_go_negative() {
        let mut p = player();
        for _ in 0..6 {
            p.take_damage(20, 2);
        }
        assert_eq!(p.hp(), -20);
        assert_eq!(p.status(), GameStatus::Playing);
    }

    #[test]
    fn take_damage_on_untracked_domain_only_counts_globally() {
        let mut p = player();
        p.take_damage(10, 9);
        assert_eq!(p.wrong_answers(), 1);
        assert!(p.domain_stats(9).is_none());
    }

    #[test]
    fn gain_xp_reports_title_change() {
        let mut p = titled_player();
        assert_eq!(p.title("fantasy"), "Novice");

        let changed = p.gain_xp(100, 1);

        assert!(changed);
        assert_eq!(p.title("fantasy"), "Adept");
        assert_eq!(p.correct_answers(), 1);
        assert_eq!(p.domain_stats(1).unwrap().correct, 1);
    }

    #[test]
    fn gain_xp_without_crossing_threshold() {
        let mut p = titled_player();
        assert!(!p.gain_xp(50, 1));
        assert!(p.gain_xp(50, 1));
        assert!(!p.gain_xp(50, 1));
    }

    #[test]
    fn gain_xp_reports_promotion_for_tiers_without_default_names() {
        let tiers = vec![
            TitleDef {
                threshold: 0,
                names: [("space".to_string(), "Cadet".to_string())].into(),
            },
            TitleDef {
                threshold: 100,
                names: [("space".to_string(), "Pilot".to_string())].into(),
            },
        ];
        let mut p = Player::new("Ayla", 100, 100, 1, 500, tiers);
        assert_eq!(p.title("fantasy"), "Unknown");

        assert!(p.gain_xp(100, 1));
        assert_eq!(p.title("space"), "Pilot");
        assert!(!p.gain_xp(100, 1));
    }

    #[test]
    fn xp_is_monotonic() {
        let mut p = player();
        let mut last = p.xp();
        for amount in [0, 10, 0, 50, 1] {
            p.gain_xp(amount, 1);
            assert!(p.xp() >= last);
            last = p.xp();
        }
    }

    #[test]
    fn title_is_monotonic_in_xp() {
        let tiers = vec![
            TitleDef::new(0, "Novice"),
            TitleDef::new(200, "Journeyman"),
            TitleDef::new(500, "Master"),
        ];
        let mut p = Player::new("Ayla", 100, 100, 1, 1000, tiers.clone());
        let rank = |title: &str| tiers.iter().position(|t| t.name_for("fantasy") == title);

        let mut last = rank(p.title("fantasy"));
        for _ in 0..20 {
            p.gain_xp(50, 1);
            let current = rank(p.title("fantasy"));
            assert!(current >= last);
            last = current;
        }
        assert_eq!(p.title("fantasy"), "Master");
    }

    #[test]
    fn title_defaults_to_novice_below_every_threshold() {
        let p = Player::new("Ayla", 100, 100, 1, 1000, vec![TitleDef::new(50, "Squire")]);
        assert_eq!(p.title("fantasy"), BASE_TITLE);
    }

    #[test]
    fn heal_caps_at_max_hp() {
        let mut p = player();
        p.take_damage(10, 1);

        let healed = p.heal(30);

        assert_eq!(healed, 10);
        assert_eq!(p.hp(), 100);
    }

    #[test]
    fn heal_never_exceeds_max_hp() {
        let mut p = player();
        p.take_damage(75, 1);
        for amount in [5, 0, 40, 100, 1] {
            p.heal(amount);
            assert!(p.hp() <= p.max_hp());
        }
        assert_eq!(p.heal(5), 0);
    }

    #[test]
    fn heal_from_negative_hp() {
        let mut p = player();
        p.take_damage(130, 1);
        assert_eq!(p.heal(5), 5);
        assert_eq!(p.hp(), -25);
    }

    #[test]
    fn complete_scenario_is_idempotent() {
        let mut p = player();
        let id = ScenarioId::from("d1_s01");

        p.complete_scenario(&id);
        p.complete_scenario(&id);

        assert_eq!(p.completed_count(), 1);
        assert!(p.has_completed("d1_s01"));
    }

    #[test]
    fn accuracy_is_zero_without_answers() {
        let p = player();
        assert_eq!(p.accuracy(), 0.0);
        assert_eq!(p.domain_accuracy(1), 0.0);
        assert_eq!(p.performance_rating(), PerformanceRating::NeedsImprovement);
    }

    #[test]
    fn accuracy_and_rating() {
        let mut p = player();
        for _ in 0..4 {
            p.gain_xp(50, 1);
        }
        p.take_damage(20, 2);

        assert_eq!(p.accuracy(), 80.0);
        assert_eq!(p.domain_accuracy(1), 100.0);
        assert_eq!(p.domain_accuracy(2), 0.0);
        assert_eq!(p.performance_rating(), PerformanceRating::Proficient);
    }

    #[test]
    fn rating_bands() {
        assert_eq!(PerformanceRating::from_accuracy(95.0).as_str(), "Exemplary");
        assert_eq!(PerformanceRating::from_accuracy(90.0).as_str(), "Exemplary");
        assert_eq!(PerformanceRating::from_accuracy(89.9).as_str(), "Proficient");
        assert_eq!(PerformanceRating::from_accuracy(70.0).as_str(), "Competent");
        assert_eq!(PerformanceRating::from_accuracy(60.0).as_str(), "Developing");
        assert_eq!(
            PerformanceRating::from_accuracy(59.9).to_string(),
            "Needs Improvement"
        );
    }

    #[test]
    fn jump_to_domain_credits_skipped_domains() {
        let mut p = player();
        let awarded = p.jump_to_domain(3, 10 * 50);

        assert_eq!(awarded, Some(1000));
        assert_eq!(p.xp(), 1000);
        assert_eq!(p.current_domain(), 3);
        assert_eq!(p.correct_answers(), 0);
    }

    #[test]
    fn jump_to_first_domain_awards_nothing() {
        let mut p = player();
        assert_eq!(p.jump_to_domain(1, 500), Some(0));
        assert_eq!(p.xp(), 0);
    }

    #[test]
    fn jump_to_invalid_domain_is_rejected() {
        let mut p = player();
        assert_eq!(p.jump_to_domain(0, 500), None);
        assert_eq!(p.jump_to_domain(4, 500), None);
        assert_eq!(p.current_domain(), 1);
    }

    #[test]
    fn advance_stops_at_last_domain() {
        let mut p = player();
        assert!(p.advance_domain());
        assert!(p.advance_domain());
        assert!(!p.advance_domain());
        assert_eq!(p.current_domain(), 3);
        assert!(p.is_playing());
    }

    #[test]
    fn finish_sets_victory_sentinel() {
        let mut p = player();
        p.finish();
        assert_eq!(p.current_domain(), 4);
        assert_eq!(p.status(), GameStatus::Victory);
    }
}

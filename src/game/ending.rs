//! End-of-session evaluation

use crate::domain::{CertificationConfig, PerformanceRating, Player};
use serde::Serialize;

/// Minimum domain accuracy (percent) to count a domain as passed
pub const DOMAIN_PASS_THRESHOLD: f64 = 75.0;

/// Accuracy (percent) from which weak domains are no longer listed
pub const WEAK_DOMAIN_LISTING_CEILING: f64 = 90.0;

/// Which closing narrative the session earns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndingBand {
    /// Accuracy of at least 80%
    Mastery,
    /// Accuracy of at least 60%
    Completion,
    Remedial,
}

impl EndingBand {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 80.0 {
            Self::Mastery
        } else if accuracy >= 60.0 {
            Self::Completion
        } else {
            Self::Remedial
        }
    }
}

/// Exam-readiness guidance shown under the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Readiness {
    StrongCandidate,
    GoodFoundation,
    MoreStudyNeeded,
    AdditionalPreparation,
}

impl Readiness {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Self::StrongCandidate
        } else if accuracy >= 80.0 {
            Self::GoodFoundation
        } else if accuracy >= 70.0 {
            Self::MoreStudyNeeded
        } else {
            Self::AdditionalPreparation
        }
    }
}

/// Result of one attempted domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainResult {
    pub domain: u32,
    pub name: String,
    pub short_name: String,
    pub correct: u32,
    pub attempts: u32,
    pub accuracy: f64,
    pub passed: bool,
}

/// Everything the ending screen needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub player_name: String,
    pub certification_name: String,
    pub title: String,
    pub xp: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub accuracy: f64,
    pub rating: PerformanceRating,
    pub band: EndingBand,
    pub readiness: Readiness,
    /// Domains with at least one answer, in domain order
    pub domains: Vec<DomainResult>,
    /// Domains below the pass threshold; empty at 90% accuracy or above
    pub weak_domains: Vec<DomainResult>,
    pub victory_message: String,
}

impl SessionSummary {
    pub fn evaluate(
        player: &Player,
        config: &CertificationConfig,
        theme_key: &str,
        victory_message: &str,
    ) -> Self {
        let accuracy = player.accuracy();

        let domains: Vec<DomainResult> = player
            .all_domain_stats()
            .iter()
            .filter(|(_, stats)| stats.attempts() > 0)
            .map(|(&domain, stats)| {
                let accuracy = stats.accuracy();
                DomainResult {
                    domain,
                    name: config.domain_name(domain),
                    short_name: config.domain_short_name(domain),
                    correct: stats.correct,
                    attempts: stats.attempts(),
                    accuracy,
                    passed: accuracy >= DOMAIN_PASS_THRESHOLD,
                }
            })
            .collect();

        let weak_domains = if accuracy < WEAK_DOMAIN_LISTING_CEILING {
            domains.iter().filter(|d| !d.passed).cloned().collect()
        } else {
            Vec::new()
        };

        let victory_message = if victory_message.is_empty() {
            format!("Congratulations on completing {}!", config.name)
        } else {
            victory_message.to_string()
        };

        Self {
            player_name: player.name.clone(),
            certification_name: config.name.clone(),
            title: player.title(theme_key).to_string(),
            xp: player.xp(),
            correct_answers: player.correct_answers(),
            wrong_answers: player.wrong_answers(),
            accuracy,
            rating: player.performance_rating(),
            band: EndingBand::from_accuracy(accuracy),
            readiness: Readiness::from_accuracy(accuracy),
            domains,
            weak_domains,
            victory_message,
        }
    }

    pub fn total_answers(&self) -> u32 {
        self.correct_answers + self.wrong_answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainInfo;

    fn config() -> CertificationConfig {
        CertificationConfig {
            name: "SEC+".to_string(),
            domain_count: 3,
            domains: vec![
                DomainInfo {
                    id: 1,
                    name: "Threats".to_string(),
                    ..Default::default()
                },
                DomainInfo {
                    id: 2,
                    name: "Architecture".to_string(),
                    short_name: Some("Arch".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn player() -> Player {
        Player::new("Ayla", 100, 100, 3, 1500, Vec::new())
    }

    #[test]
    fn bands_follow_accuracy() {
        assert_eq!(EndingBand::from_accuracy(80.0), EndingBand::Mastery);
        assert_eq!(EndingBand::from_accuracy(79.9), EndingBand::Completion);
        assert_eq!(EndingBand::from_accuracy(60.0), EndingBand::Completion);
        assert_eq!(EndingBand::from_accuracy(0.0), EndingBand::Remedial);
        assert_eq!(Readiness::from_accuracy(90.0), Readiness::StrongCandidate);
        assert_eq!(Readiness::from_accuracy(75.0), Readiness::MoreStudyNeeded);
        assert_eq!(Readiness::from_accuracy(10.0), Readiness::AdditionalPreparation);
    }

    #[test]
    fn breakdown_skips_unattempted_domains() {
        let mut p = player();
        p.gain_xp(50, 1);
        p.gain_xp(50, 1);
        p.take_damage(20, 2);

        let summary = SessionSummary::evaluate(&p, &config(), "fantasy", "");

        let attempted: Vec<u32> = summary.domains.iter().map(|d| d.domain).collect();
        assert_eq!(attempted, vec![1, 2]);
        assert!(summary.domains[0].passed);
        assert!(!summary.domains[1].passed);
        assert_eq!(summary.domains[1].short_name, "Arch");
    }

    #[test]
    fn weak_domains_listed_below_ninety_percent() {
        let mut p = player();
        for _ in 0..3 {
            p.gain_xp(50, 1);
        }
        p.gain_xp(50, 2);
        p.take_damage(20, 2);
        p.take_damage(20, 2);

        let summary = SessionSummary::evaluate(&p, &config(), "fantasy", "");

        assert_eq!(summary.accuracy, 4.0 / 6.0 * 100.0);
        assert_eq!(summary.band, EndingBand::Completion);
        assert_eq!(summary.weak_domains.len(), 1);
        assert_eq!(summary.weak_domains[0].name, "Architecture");
    }

    #[test]
    fn weak_domains_hidden_at_ninety_percent() {
        let mut p = player();
        for _ in 0..9 {
            p.gain_xp(50, 1);
        }
        p.take_damage(20, 2);

        let summary = SessionSummary::evaluate(&p, &config(), "fantasy", "Well met.");

        assert_eq!(summary.accuracy, 90.0);
        assert!(summary.weak_domains.is_empty());
        assert_eq!(summary.domains.len(), 2);
        assert_eq!(summary.victory_message, "Well met.");
    }

    #[test]
    fn domain_at_exactly_threshold_passes() {
        let mut p = player();
        for _ in 0..3 {
            p.gain_xp(50, 3);
        }
        p.take_damage(20, 3);

        let summary = SessionSummary::evaluate(&p, &config(), "fantasy", "");

        assert_eq!(summary.domains[0].accuracy, 75.0);
        assert!(summary.domains[0].passed);
        assert_eq!(summary.domains[0].name, "Domain 3");
    }

    #[test]
    fn empty_session_summary() {
        let summary = SessionSummary::evaluate(&player(), &config(), "fantasy", "");

        assert_eq!(summary.accuracy, 0.0);
        assert_eq!(summary.total_answers(), 0);
        assert!(summary.domains.is_empty());
        assert_eq!(summary.band, EndingBand::Remedial);
        assert_eq!(summary.victory_message, "Congratulations on completing SEC+!");
    }
}

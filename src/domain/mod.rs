//! Domain layer - Game model independent of terminal and file formats
//!
//! Holds the player progression record, the scenario entity, theme
//! management, and the resolved certification configuration.

pub mod config;
pub mod errors;
pub mod player;
pub mod repositories;
pub mod scenario;
pub mod theme;
pub mod value_objects;

pub use config::{CertificationConfig, DomainInfo, DomainIntro, IntroText, Scoring, TitleDef};
pub use errors::ContentError;
pub use player::{DomainStats, GameStatus, PerformanceRating, Player};
pub use repositories::{CertificationRepository, CertificationSummary};
pub use scenario::{Choice, DEFAULT_THEME_KEY, Scenario, ThemedContent};
pub use theme::{ThemeDefinition, ThemeManager, Voice};
pub use value_objects::{CertificationId, ScenarioId};

//! # certquest
//!
//! A terminal quiz game for certification study. Players answer scenario
//! questions grouped into the certification's domains, gaining xp for
//! correct answers and losing hp for wrong ones. Every piece of content,
//! including the alternate story themes, comes from YAML certification packs.
//!
//! The game core ([`game::GameController`]) never touches the terminal: it
//! reads through an [`input::InputSource`] and reports [`game::GameEvent`]s
//! to a [`game::Presenter`]. The [`cli`] module provides the terminal
//! versions of both, and [`infrastructure`] loads packs from disk.
//!
//! ## Quick Start
//!
//! ```rust
//! use certquest::domain::{CertificationConfig, Choice, Scenario, ThemedContent};
//! use certquest::game::{GameController, RecordingPresenter};
//! use certquest::input::ScriptedInput;
//! use std::collections::BTreeMap;
//!
//! let content = ThemedContent {
//!     title: "The Gate".to_string(),
//!     narrative: "Raiders approach the gate.".to_string(),
//!     choices: vec![Choice::new("Bar the gate"), Choice::new("Open it")],
//!     ..Default::default()
//! };
//! let mut scenarios = BTreeMap::new();
//! scenarios.insert(1, vec![Scenario::new("gate", 1).with_theme("fantasy", content)]);
//!
//! let config = CertificationConfig {
//!     name: "DEMO".to_string(),
//!     domain_count: 1,
//!     scenarios,
//!     ..Default::default()
//! };
//!
//! // theme 1, intro, name, welcome, start at domain 1, answer 1, continue
//! let input = ScriptedInput::new(["1", "", "Ayla", "", "", "1", ""]);
//! let mut game = GameController::with_seed(config, input, RecordingPresenter::new(), 42);
//!
//! let summary = game.run().expect("player was named");
//! assert_eq!(summary.correct_answers, 1);
//! assert_eq!(summary.xp, 50);
//! ```

pub mod cli;
pub mod domain;
pub mod game;
pub mod infrastructure;
pub mod input;

pub use domain::{CertificationConfig, ContentError, Player, Scenario, ThemeManager};
pub use game::{GameController, GameEvent, Presenter, SessionSummary};
pub use input::{Command, InputSource, ScriptedInput};

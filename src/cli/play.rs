//! Play mode: run one certification session in the terminal

use crate::cli::terminal::{StdinInput, TYPEWRITER_DELAY, TerminalPresenter};
use crate::domain::{CertificationConfig, CertificationId, CertificationRepository};
use crate::game::GameController;
use anyhow::Context;

/// Options of the `play` command
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Seed for reproducible scenario sampling
    pub seed: Option<u64>,
    /// Dump the player state after every turn
    pub debug: bool,
    pub typewriter: bool,
}

/// Load a certification, attaching the id to any failure
pub async fn load_certification(
    repository: &dyn CertificationRepository,
    id: &str,
) -> anyhow::Result<CertificationConfig> {
    let id = CertificationId::from(id);
    let config = repository
        .load(&id)
        .await
        .with_context(|| format!("Failed to load certification '{}'", id))?;

    if config.scenario_count() == 0 {
        anyhow::bail!("Certification '{}' has no playable scenarios", id);
    }
    Ok(config)
}

/// Run the interactive session on stdin/stdout
pub fn run_play(config: CertificationConfig, options: &PlayOptions) -> anyhow::Result<()> {
    let presenter = TerminalPresenter::new()
        .with_debug(options.debug)
        .with_typewriter(options.typewriter.then_some(TYPEWRITER_DELAY));
    let input = StdinInput::new().context("Failed to open terminal input")?;

    let mut game = match options.seed {
        Some(seed) => GameController::with_seed(config, input, presenter, seed),
        None => GameController::new(config, input, presenter),
    };

    match game.run() {
        Some(summary) => log::debug!(
            "Final result: {:.1}% accuracy, rating {}",
            summary.accuracy,
            summary.rating
        ),
        None => println!("\n  Goodbye!"),
    }

    Ok(())
}

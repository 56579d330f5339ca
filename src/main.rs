//! CLI entry point for certquest
//!
//! Lists the certification packs on disk and plays a session of one of them.

use certquest::cli::{self, PlayOptions};
use certquest::infrastructure::FileSystemCertificationRepository;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "certquest")]
#[command(about = "Certification study quests in the terminal")]
#[command(version)]
struct Cli {
    /// Directory holding one subdirectory per certification pack
    #[arg(long, global = true, env = "CERTQUEST_DIR", default_value = "certifications")]
    dir: PathBuf,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available certifications
    List,
    /// Play a certification
    Play {
        /// Certification id (its directory name)
        cert_id: String,

        /// Seed for reproducible scenario selection
        #[arg(long)]
        seed: Option<u64>,

        /// Show the player state after every turn
        #[arg(long)]
        debug: bool,

        /// Print narrative text instantly
        #[arg(long)]
        no_typewriter: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("Reason: {}", cause);
        }
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let repository = FileSystemCertificationRepository::new(&cli.dir);
    log::debug!("Using certifications directory {}", cli.dir.display());

    // Content loading is the only async work; the game loop itself is synchronous
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::List => runtime.block_on(cli::run_list(&repository)),
        Command::Play {
            cert_id,
            seed,
            debug,
            no_typewriter,
        } => {
            let config = runtime.block_on(cli::load_certification(&repository, &cert_id))?;
            drop(runtime);

            let options = PlayOptions {
                seed,
                debug,
                typewriter: !no_typewriter,
            };
            cli::run_play(config, &options)
        }
    }
}

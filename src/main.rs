mod appearance;
mod clock;
mod config;
mod engine;
mod error;
mod flavor;
mod game;
mod logger;
mod progression;
mod scheduler;
mod snake;
mod term;

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use config::{Config, Validate, CONFIG_FILE_NAME};
use error::{GameError, GameResult};

pub type TermInt = u16;
pub type Cell = (i16, i16);

pub const GRID_SIZE: i16 = 20;

#[derive(Parser, Debug)]
#[command(name = "serpent", version, about = "Terminal snake with shifting biomes")]
struct Args {
    /// YAML config file
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Seed for food placement and flavor text
    #[arg(long)]
    seed: Option<u64>,

    /// Starting milliseconds per move
    #[arg(long = "tick-ms")]
    tick_ms: Option<f64>,

    /// Write the effective config to --config and exit
    #[arg(long)]
    write_config: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(args: Args) -> GameResult<()> {
    let mut config = config::load_config(&args.config)?;
    apply_overrides(&mut config, &args)?;

    if args.write_config {
        config::save_config(&args.config, &config)?;
        println!("Wrote {}", args.config.display());
        return Ok(());
    }

    if let Some(path) = &config.log_file {
        logger::init_logger(Some("serpent".to_string()), path)?;
    }
    log!("Starting with {}: {:?}", args.config.display(), config);

    let mut game = game::SnakeGame::new(config)?;

    // The terminal goes back to normal before any error is printed, and the
    // first error wins over one from restoring.
    let result = game.initialize().and_then(|_| game.run());
    let restored = game.restore();
    if let Err(ref e) = result {
        log!("Exiting with error: {}", e);
    }
    first_error(result, restored)
}

fn first_error(result: GameResult<()>, restored: GameResult<()>) -> GameResult<()> {
    result.and(restored)
}

/// Command line values win over the file. The merged config is validated.
fn apply_overrides(config: &mut Config, args: &Args) -> GameResult<()> {
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(tick_ms) = args.tick_ms {
        config.initial_tick_interval_ms = tick_ms;
    }
    config.validate().map_err(GameError::Config)
}

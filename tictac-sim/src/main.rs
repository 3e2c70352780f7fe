//! Tictac host simulator
//!
//! Plays one session on the simulated gantry against a random human and
//! logs it. An optional argument names a TOML file to use instead of the
//! embedded robot.toml; `TICTAC_SEED` fixes the session.

mod config;

use anyhow::{anyhow, Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tictac_core::game::{GameEngine, GridCell, Outcome};
use tictac_core::traits::RngSource;
use tictac_drivers::sim::{Gantry, SimIndicator};
use tracing::{info, warn};

/// Polls the simulated human waits before pressing the button
const HUMAN_HESITATION: u32 = 300;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = std::env::args().nth(1);
    let config = config::load_config(path.as_deref()).context("loading configuration")?;
    let seed = session_seed(std::env::var("TICTAC_SEED").ok())?;
    info!(seed, "Starting session");

    let gantry = Gantry::new(&config);
    let mut human_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let human = move |free: &[GridCell]| {
        if free.is_empty() {
            return None;
        }
        let cell = free[human_rng.gen_range(0..free.len())];
        info!(row = cell.row, col = cell.col, "Human places a brick");
        Some(cell)
    };

    let mut engine = GameEngine::new(
        gantry.motion(),
        &config,
        SimIndicator::new(),
        gantry.human(human).hesitating(HUMAN_HESITATION),
        RngSource(ChaCha8Rng::seed_from_u64(seed)),
    );

    let report = engine
        .run()
        .map_err(|err| anyhow!("session failed in {:?}: {}", engine.phase(), err))?;

    match report.outcome {
        Outcome::Winner(side) => info!(?side, moves = report.moves.len(), "Game won"),
        Outcome::Draw => info!(moves = report.moves.len(), "Game drawn"),
        Outcome::InProgress => warn!("Session ended before the game did"),
    }

    let world = gantry.world();
    info!(
        starter = ?report.starter,
        simulated_s = world.clock_ms() / 1_000,
        "Board cleared"
    );
    if world.collisions() > 0 {
        warn!(collisions = world.collisions(), "Bricks were knocked during the session");
    }
    Ok(())
}

/// Seed from the `TICTAC_SEED` value, or a fresh random one
fn session_seed(fixed: Option<String>) -> Result<u64> {
    match fixed {
        Some(value) => value
            .parse()
            .with_context(|| format!("TICTAC_SEED must be an unsigned integer, got {value:?}")),
        None => Ok(rand::random()),
    }
}

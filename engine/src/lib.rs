pub mod config;
pub mod dataflow;
pub mod eval;
pub mod neural;
pub mod sync;
pub mod train;

use arcade::{Catch, CatchConfig, Player, PlayerFactory};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// Returns a factory of Catch players, each seeded differently.
///
pub fn catch_factory (config: CatchConfig, seed: u64) -> utils::Result<PlayerFactory>
{
    // Reject a bad board here rather than on every worker.

    Catch::new(config, seed)?;

    let counter = Arc::new(AtomicU64::new(seed));
    let factory : PlayerFactory = Arc::new(move || -> utils::Result<Box<dyn Player>>
    {
        let seed = counter.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(Catch::new(config, seed)?) as Box<dyn Player>)
    });

    Ok(factory)
}

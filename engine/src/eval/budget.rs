
use std::time::Duration;

use utils::error::*;

///
/// Adapts the number of evaluation episodes to a wall-clock ceiling.
///
/// Whenever an evaluation takes longer than the ceiling, the next one is 
/// asked for `floor(episodes * decay)` episodes, but never fewer than the 
/// floor.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeBudget 
{
    episodes: usize,
    ceiling: Duration,
    decay: f64,
    floor: usize
}

impl EpisodeBudget 
{
    ///
    /// Returns the number of episodes the next evaluation should play.
    ///
    pub fn episodes (& self) -> usize 
    {
        self.episodes
    }

    ///
    /// Creates a budget starting at `episodes`. The decay must lie in (0, 1].
    ///
    pub fn new (episodes: usize, ceiling: Duration, decay: f64, floor: usize) -> Result<EpisodeBudget>
    {
        ensure!(decay > 0.0 && decay <= 1.0, "Episode decay {} is outside of (0, 1].", decay);
        Ok(EpisodeBudget { episodes, ceiling, decay, floor })
    }

    ///
    /// Feeds the duration of the last evaluation and returns the updated 
    /// number of episodes.
    ///
    pub fn observe (& mut self, elapsed: Duration) -> usize 
    {
        if elapsed > self.ceiling 
        {
            let shrunk = (self.episodes as f64 * self.decay).floor() as usize;
            self.episodes = shrunk.max(self.floor.min(self.episodes));
        }

        self.episodes
    }
}

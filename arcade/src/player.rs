
use super::action::ActionSpace;

use std::sync::Arc;

use utils::error::*;

///
/// A game environment as seen by an agent.
///
/// A player owns its own game state and randomness, so that each worker 
/// thread can drive an independent instance. The agent only ever sees 
/// observations and hands back actions.
///
pub trait Player : Send 
{
    ///
    /// Returns the action space of this game.
    ///
    fn action_space (& self) -> ActionSpace;

    ///
    /// Returns the length of the observation vectors this game produces.
    ///
    fn observation_size (& self) -> usize;

    ///
    /// Plays one full episode from a fresh start, asking `select` for an 
    /// action at every step, and returns the reward received at each step.
    ///
    fn play_one_episode (& mut self, select: & mut dyn FnMut(& [f32]) -> Result<usize>) -> Result<Vec<f32>>;
}

///
/// Builds a fresh player; shared between the threads that need one each.
///
pub type PlayerFactory = Arc<dyn Fn() -> Result<Box<dyn Player>> + Send + Sync>;

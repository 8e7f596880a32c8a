
use super::DataFlow;

use arcade::{Catch, CatchConfig, Player};

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use utils::error::*;

///
/// One training batch: observations and the action to imitate for each.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Batch 
{
    pub observations: Vec<Vec<f32>>,
    pub actions: Vec<usize>
}

impl Batch 
{
    ///
    /// Returns the number of examples in the batch.
    ///
    pub fn len (& self) -> usize 
    {
        self.actions.len()
    }

    ///
    /// Returns whether the batch has no examples.
    ///
    pub fn is_empty (& self) -> bool 
    {
        self.actions.is_empty()
    }
}

///
/// Produces imitation batches by watching an oracle play Catch.
///
/// Every visited state is labelled with the oracle's action, but with 
/// probability `explore` a random action is actually played, so that the 
/// batches also cover states the oracle itself would never reach.
///
#[derive(Debug)]
pub struct ExpertPlay 
{
    game_config: CatchConfig,
    seed: u64,
    batch_size: usize,
    batches_per_pass: usize,
    explore: f64,

    game: Catch,
    rng: StdRng,
    produced: usize
}

impl ExpertPlay 
{
    ///
    /// Creates a dataflow of `batches_per_pass` batches of `batch_size` 
    /// examples per pass.
    ///
    pub fn new (game_config: CatchConfig, seed: u64, batch_size: usize, batches_per_pass: usize, explore: f64) -> Result<ExpertPlay>
    {
        ensure!(batch_size > 0, "Batch size must be positive.");
        ensure!(batches_per_pass > 0, "A pass needs at least one batch.");
        ensure!((0.0 ..= 1.0).contains(& explore), "Exploration rate {} is not a probability.", explore);

        let game = Catch::new(game_config, seed)?;
        let rng = StdRng::seed_from_u64(seed.wrapping_add(1));

        Ok(ExpertPlay { game_config, seed, batch_size, batches_per_pass, explore, game, rng, produced: 0 })
    }

    fn next_example (& mut self) -> Result<(Vec<f32>, usize)>
    {
        if self.game.is_over()
        {
            self.game.reset();
        }

        let observation = self.game.observation();
        let label = self.game.expert_action();

        let action = if self.rng.random_bool(self.explore) 
        {
            self.game.action_space().sample(& mut self.rng)
        }
        else 
        {
            label
        };
        self.game.step(action)?;

        Ok((observation, label))
    }
}

impl DataFlow for ExpertPlay 
{
    type Datapoint = Batch;

    fn reset_state (& mut self)
    {
        // Reseeding per reset keeps every consumer's stream reproducible.

        if let Ok(game) = Catch::new(self.game_config, self.seed)
        {
            self.game = game;
        }
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(1));
        self.produced = 0;
    }

    fn get_data (& mut self) -> Result<Option<Batch>>
    {
        if self.produced >= self.batches_per_pass 
        {
            self.produced = 0;
            return Ok(None);
        }

        let mut observations = Vec::with_capacity(self.batch_size);
        let mut actions = Vec::with_capacity(self.batch_size);
        for _ in 0 .. self.batch_size 
        {
            let (observation, action) = self.next_example()?;
            observations.push(observation);
            actions.push(action);
        }
        self.produced += 1;

        Ok(Some(Batch { observations, actions }))
    }

    fn size (& self) -> Option<usize>
    {
        Some(self.batches_per_pass)
    }
}


use crate::neural::{Model, PredictFn};
use crate::train::{Callback, TrainContext};

use super::budget::EpisodeBudget;
use super::config::Config as EvalConfig;
use super::driver::{default_num_workers, eval_with_funcs};

use arcade::PlayerFactory;

use std::sync::Arc;
use std::time::{Duration, Instant};

use utils::error::*;
use utils::log;

///
/// Evaluates the live policy at the end of every epoch and records its 
/// mean and max score.
///
/// The number of episodes shrinks whenever an evaluation overruns its 
/// time ceiling, see `EpisodeBudget`.
///
pub struct Evaluator 
{
    config: EvalConfig,
    budget: EpisodeBudget,
    player_factory: PlayerFactory,
    funcs: Vec<Arc<dyn PredictFn>>
}

impl Evaluator 
{
    ///
    /// Returns the number of episodes the next evaluation will play.
    ///
    pub fn episodes (& self) -> usize 
    {
        self.budget.episodes()
    }

    ///
    /// Creates an evaluator playing on players built by the factory.
    ///
    /// Fails if the exploration rate or the episode decay is out of range.
    ///
    pub fn new (config: EvalConfig, player_factory: PlayerFactory) -> Result<Evaluator>
    {
        ensure!((0.0 ..= 1.0).contains(& config.epsilon), "Exploration rate {} is outside of [0, 1].", config.epsilon);

        let budget = EpisodeBudget::new(
            config.nr_eval, 
            Duration::from_secs(config.time_ceiling_secs), 
            config.decay, 
            config.min_episodes
        )?;

        Ok(Evaluator { config, budget, player_factory, funcs: Vec::new() })
    }
}

impl<M: Model> Callback<M> for Evaluator 
{
    fn before_train (& mut self, ctx: & mut TrainContext<M>) -> Result<()>
    {
        let num_workers = match self.config.num_workers 
        {
            0 => default_num_workers(),
            n => n
        };

        let func : Arc<dyn PredictFn> = Arc::new(ctx.get_predict_func());
        self.funcs = vec![func; num_workers];

        log::info!("Evaluating on {} workers.", num_workers);
        Ok(())
    }

    fn trigger_epoch (& mut self, ctx: & mut TrainContext<M>) -> Result<()>
    {
        ensure!(! self.funcs.is_empty(), "The evaluator was triggered before training started.");

        let episodes = self.budget.episodes();
        let seed = self.config.seed.wrapping_add((ctx.epoch as u64) << 16);

        let start = Instant::now();
        let summary = eval_with_funcs(& self.funcs, episodes, & self.player_factory, self.config.epsilon, seed, ctx.coordinator())?;
        let elapsed = start.elapsed();

        let next = self.budget.observe(elapsed);
        if next != episodes 
        {
            log::info!("Evaluation took {:.1} sec; playing {} instead of {} episodes from now on.", elapsed.as_secs_f64(), next, episodes);
        }

        match summary 
        {
            Some(summary) => 
            {
                ctx.write_scalar_summary("mean_score", summary.mean)?;
                ctx.write_scalar_summary("max_score", summary.max)?;
            },
            None => log::warn!("Epoch {} evaluation collected no episodes; no score recorded.", ctx.epoch)
        }

        Ok(())
    }
}


use crate::neural::PredictFn;
use crate::sync::{BoundedQueue, Coordinator, QueueError, StoppableThread};

use super::config::Config as EvalConfig;
use super::episode::play_one_episode;
use super::stat::StatCounter;

use arcade::PlayerFactory;

use rand::SeedableRng;
use rand::rngs::StdRng;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use utils::error::*;
use utils::log;

///
/// The capacity of the queue workers report scores into. Kept small so 
/// that the workers never run far ahead of the aggregation.
///
pub const RESULT_QUEUE_CAPACITY : usize = 2;

///
/// How often the aggregation wakes up to check for an abort or for a 
/// pool of workers that has died out.
///
pub const DRAIN_POLL_INTERVAL : Duration = Duration::from_millis(100);

///
/// The result of a completed evaluation.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalSummary 
{
    pub mean: f64,
    pub max: f64,
    pub count: usize
}

///
/// Returns the number of evaluation workers to use on this machine: half 
/// the available parallelism, between 1 and 8.
///
pub fn default_num_workers () -> usize 
{
    let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
    (cpus / 2).clamp(1, 8)
}

///
/// Evaluates a policy with one worker thread per inference function.
///
/// Each worker plays episodes on its own player and reports every score 
/// into a shared bounded queue; exactly `nr_eval` scores are aggregated. 
/// If aggregation fails, is aborted through `abort`, or every worker has 
/// died, the scores collected so far are kept. All workers are then asked 
/// to stop and joined.
///
/// Returns `None` when no score at all was collected.
///
pub fn eval_with_funcs (funcs: & [Arc<dyn PredictFn>], nr_eval: usize, player_factory: & PlayerFactory, epsilon: f64, seed: u64, abort: & Coordinator) -> Result<Option<EvalSummary>>
{
    if nr_eval == 0 
    {
        return Ok(None);
    }
    ensure!(! funcs.is_empty(), "Evaluation needs at least one inference function.");
    ensure!((0.0 ..= 1.0).contains(& epsilon), "Exploration rate {} is outside of [0, 1].", epsilon);

    let queue = Arc::new(BoundedQueue::new(RESULT_QUEUE_CAPACITY)?);

    let mut workers = Vec::with_capacity(funcs.len());
    for (k, func) in funcs.iter().enumerate()
    {
        let mut worker = StoppableThread::new(format!("eval-worker-{}", k));

        let func = func.clone();
        let queue = queue.clone();
        let factory = player_factory.clone();
        let seed = seed.wrapping_add(k as u64);

        worker.start(move |token| 
        {
            let mut player = factory()?;
            let mut rng = StdRng::seed_from_u64(seed);

            while ! token.stopped()
            {
                let score = play_one_episode(player.as_mut(), func.as_ref(), epsilon, & mut rng)?;
                if ! token.queue_put_stoppable(& queue, score)
                {
                    break;
                }
            }

            Ok(())
        })?;
        workers.push(worker);
    }

    let mut stat = StatCounter::new();
    if let Err(e) = drain(& queue, & workers, nr_eval, abort, & mut stat)
    {
        log::error!("Eval: {:#}", e);
    }

    let lost = workers.iter().filter(|w| w.is_finished() && ! w.stopped()).count();
    if lost > 0 
    {
        log::warn!("{} of {} evaluation workers died during the run.", lost, workers.len());
    }

    log::info!("Waiting for all the workers to finish the last run...");
    workers.iter().for_each(|w| w.stop());
    for worker in workers.iter_mut()
    {
        if let Err(e) = worker.join()
        {
            log::error!("{:#}", e);
        }
    }

    Ok(summarize(& stat))
}

///
/// Evaluates one inference function on as many workers as the machine 
/// affords (or as configured), and logs the result.
///
pub fn eval_model_multithread (func: Arc<dyn PredictFn>, config: & EvalConfig, player_factory: & PlayerFactory, abort: & Coordinator) -> Result<Option<EvalSummary>>
{
    let num_workers = match config.num_workers 
    {
        0 => default_num_workers(),
        n => n
    };

    let funcs = vec![func; num_workers];
    let summary = eval_with_funcs(& funcs, config.nr_eval, player_factory, config.epsilon, config.seed, abort)?;

    match & summary 
    {
        Some(s) => log::info!("Average Score: {}; Max Score: {}", s.mean, s.max),
        None    => log::warn!("Evaluation finished without a single episode.")
    }

    Ok(summary)
}

fn drain (queue: & BoundedQueue<f64>, workers: & [StoppableThread], nr_eval: usize, abort: & Coordinator, stat: & mut StatCounter) -> Result<()>
{
    for _ in 0 .. nr_eval 
    {
        loop 
        {
            if abort.should_stop()
            {
                bail!("Aborted after {} of {} episodes.", stat.count(), nr_eval);
            }

            match queue.pop_timeout(DRAIN_POLL_INTERVAL)
            {
                Ok(score) => 
                {
                    stat.feed(score);
                    break;
                },
                Err(QueueError::Timeout) => 
                {
                    if workers.iter().all(|w| w.is_finished())
                    {
                        bail!("Every worker died after {} of {} episodes.", stat.count(), nr_eval);
                    }
                },
                Err(e) => return Err(e.into())
            }
        }
    }

    Ok(())
}

fn summarize (stat: & StatCounter) -> Option<EvalSummary>
{
    match (stat.average(), stat.max())
    {
        (Some(mean), Some(max)) => Some(EvalSummary { mean, max, count: stat.count() }),
        _                       => None
    }
}

//! Fan-in evaluation: worker lifecycle, aggregation, and shutdown.

mod common;
use common::*;

use engine::eval::{eval_model_multithread, eval_with_funcs, EvalConfig};
use engine::neural::PredictFn;
use engine::sync::Coordinator;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use utils::error::*;

fn funcs (n: usize, func: Arc<dyn PredictFn>) -> Vec<Arc<dyn PredictFn>>
{
    vec![func; n]
}

#[test]
fn three_workers_with_unit_scores () -> Result<()>
{
    let factory = fixed_reward_factory(1.0, Duration::ZERO);
    let funcs = funcs(3, Arc::new(always(0, 2)));

    let summary = eval_with_funcs(& funcs, 10, & factory, 0.0, 0, & Coordinator::new())?
        .ok_or_else(|| error!("no scores were collected"))?;

    assert_eq!((summary.mean, summary.max), (1.0, 1.0));
    assert_eq!(summary.count, 10);

    Ok(())
}

#[test]
fn zero_episodes_is_the_empty_result () -> Result<()>
{
    let factory = fixed_reward_factory(0.0, Duration::ZERO);
    let funcs = funcs(3, Arc::new(always(0, 2)));

    let summary = eval_with_funcs(& funcs, 0, & factory, 0.0, 0, & Coordinator::new())?;
    assert_eq!(summary, None);

    Ok(())
}

#[test]
fn real_zero_scores_are_not_the_empty_result () -> Result<()>
{
    let factory = fixed_reward_factory(0.0, Duration::ZERO);
    let funcs = funcs(2, Arc::new(always(0, 2)));

    let summary = eval_with_funcs(& funcs, 5, & factory, 0.0, 0, & Coordinator::new())?;

    assert_eq!(summary.map(|s| (s.mean, s.max, s.count)), Some((0.0, 0.0, 5)));
    Ok(())
}

#[test]
fn scores_from_all_workers_are_aggregated () -> Result<()>
{
    let factory = action_reward_factory();
    let funcs : Vec<Arc<dyn PredictFn>> = (0 .. 3).map(|k| Arc::new(always(k, 3)) as Arc<dyn PredictFn>).collect();

    let summary = eval_with_funcs(& funcs, 30, & factory, 0.0, 0, & Coordinator::new())?
        .ok_or_else(|| error!("no scores were collected"))?;

    assert_eq!(summary.count, 30);
    assert!(summary.max <= 2.0);
    assert!((0.0 ..= 2.0).contains(& summary.mean));

    Ok(())
}

#[test]
fn a_crashing_worker_does_not_stop_the_others () -> Result<()>
{
    let factory = fixed_reward_factory(1.0, Duration::ZERO);

    let broken = |_: & [Vec<f32>]| -> Result<Vec<Vec<f32>>> { bail!("inference failed") };
    let funcs : Vec<Arc<dyn PredictFn>> = vec![Arc::new(broken), Arc::new(always(0, 2)), Arc::new(always(1, 2))];

    let summary = eval_with_funcs(& funcs, 10, & factory, 0.0, 0, & Coordinator::new())?
        .ok_or_else(|| error!("no scores were collected"))?;

    assert_eq!(summary.count, 10);
    assert_eq!(summary.mean, 1.0);

    Ok(())
}

#[test]
fn a_dead_pool_returns_instead_of_hanging () -> Result<()>
{
    let factory = fixed_reward_factory(1.0, Duration::ZERO);

    let broken = |_: & [Vec<f32>]| -> Result<Vec<Vec<f32>>> { bail!("inference failed") };
    let funcs = funcs(3, Arc::new(broken));

    let start = Instant::now();
    let summary = eval_with_funcs(& funcs, 10, & factory, 0.0, 0, & Coordinator::new())?;

    assert_eq!(summary, None);
    assert!(start.elapsed() < Duration::from_secs(10));

    Ok(())
}

#[test]
fn external_abort_keeps_what_was_collected () -> Result<()>
{
    let factory = fixed_reward_factory(1.0, Duration::from_millis(20));
    let funcs = funcs(2, Arc::new(always(0, 2)));

    let abort = Coordinator::new();
    let trigger = 
    {
        let abort = abort.clone();
        thread::spawn(move || 
        {
            thread::sleep(Duration::from_millis(300));
            abort.request_stop();
        })
    };

    let start = Instant::now();
    let summary = eval_with_funcs(& funcs, 1_000_000, & factory, 0.0, 0, & abort)?
        .ok_or_else(|| error!("no scores were collected"))?;
    trigger.join().map_err(|_| error!("trigger panicked"))?;

    assert!(summary.count > 0 && summary.count < 1_000_000);
    assert_eq!(summary.mean, 1.0);
    assert!(start.elapsed() < Duration::from_secs(10));

    Ok(())
}

#[test]
fn an_out_of_range_exploration_rate_is_an_error () 
{
    let factory = fixed_reward_factory(1.0, Duration::ZERO);
    let config = EvalConfig { nr_eval: 4, num_workers: 2, epsilon: 1.5, ..EvalConfig::default() };

    let outcome = eval_model_multithread(Arc::new(always(0, 2)), & config, & factory, & Coordinator::new());
    assert!(outcome.is_err());
}

#[test]
fn multithread_eval_uses_the_configured_workers () -> Result<()>
{
    let factory = fixed_reward_factory(0.5, Duration::ZERO);
    let config = EvalConfig { nr_eval: 6, num_workers: 2, ..EvalConfig::default() };

    let summary = eval_model_multithread(Arc::new(always(0, 2)), & config, & factory, & Coordinator::new())?
        .ok_or_else(|| error!("no scores were collected"))?;

    assert_eq!((summary.mean, summary.max, summary.count), (0.5, 0.5, 6));
    Ok(())
}

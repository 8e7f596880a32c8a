
use clap::Parser;

use engine::catch_factory;
use engine::config::Config;
use engine::dataflow::ExpertPlay;
use engine::eval::{eval_model_multithread, play_model, Evaluator};
use engine::neural::{Model, PolicyNetwork, PredictFn};
use engine::sync::Coordinator;
use engine::train::{ModelSaver, SummaryWriter, Trainer};

use rand::SeedableRng;
use rand::rngs::StdRng;

use std::sync::Arc;

use utils::error::*;
use utils::log;

///
/// A structure representing command line arguments.
///
#[derive(Parser)]
struct CLIArgs
{
    #[clap(short, long, default_value = "train")]
    mode: String,

    #[clap(short, long, default_value = "config/config.toml")]
    config: String,

    ///
    /// Weights to evaluate or play with; defaults to the configured best model.
    ///
    #[clap(long)]
    model: Option<String>,

    ///
    /// Number of episodes to play in play mode; 0 plays forever.
    ///
    #[clap(short, long, default_value = "0")]
    episodes: usize
}

fn main () -> Result<()>
{
    let args = CLIArgs::parse();

    let config : Config = utils::from_toml_file(& args.config)?;
    let _logger = log::initialize(& config.log_path, "engine", & config.log_level)?;

    match args.mode.as_str()
    {
        "train" => train(& config)?,
        "eval"  => evaluate(& config, & args)?,
        "play"  => play(& config, & args)?,
        _ =>
        {
            return Err(error!("Mode '{}' is unsupported.", & args.mode));
        }
    };

    Ok(())
}

fn load_model (config: & Config, args: & CLIArgs) -> Result<PolicyNetwork>
{
    let path = args.model.clone().unwrap_or_else(|| config.neural.weights_path());
    PolicyNetwork::load(& path)
}

fn evaluate (config: & Config, args: & CLIArgs) -> Result<()>
{
    let model = load_model(config, args)?;
    let factory = catch_factory(config.game, config.eval.seed)?;
    let func : Arc<dyn PredictFn> = Arc::new(move |inputs: & [Vec<f32>]|
    {
        model.predict(inputs)
    });

    match eval_model_multithread(func, & config.eval, & factory, & Coordinator::new())?
    {
        Some(summary) => println!("Average Score: {}; Max Score: {} ({} episodes)", summary.mean, summary.max, summary.count),
        None          => println!("No episodes were completed.")
    }

    Ok(())
}

fn play (config: & Config, args: & CLIArgs) -> Result<()>
{
    let model = load_model(config, args)?;
    let factory = catch_factory(config.game, config.eval.seed)?;
    let mut player = factory()?;
    let mut rng = StdRng::seed_from_u64(config.eval.seed);

    let func = move |inputs: & [Vec<f32>]|
    {
        model.predict(inputs)
    };

    let stat = play_model(player.as_mut(), & func, config.eval.epsilon, & mut rng, & Coordinator::new(), args.episodes)?;
    if let (Some(mean), Some(max)) = (stat.average(), stat.max())
    {
        println!("Played {} episodes. Average Score: {}; Max Score: {}", stat.count(), mean, max);
    }

    Ok(())
}

fn train (config: & Config) -> Result<()>
{
    let factory = catch_factory(config.game, config.eval.seed)?;
    let probe = factory()?;

    let model = PolicyNetwork::new(& config.neural, probe.observation_size(), probe.action_space().num_actions())?;
    let dataset = ExpertPlay::new(
        config.game,
        config.neural.seed,
        config.neural.batch_size,
        config.train.batches_per_pass,
        config.train.explore
    )?;
    let summary = SummaryWriter::new(& config.log_path)?;

    log::info!("Starting run {}.", summary.run());

    let mut trainer = Trainer::new(config.train.clone(), model, dataset, summary)
        .with_callback(Evaluator::new(config.eval, factory)?)
        .with_callback(ModelSaver::new(config.neural.weights_path()));

    let outcome = trainer.train();
    println!("{}", trainer.summary().table());

    outcome
}


use utils::{Serialize, Deserialize};

///
/// A configuration for policy evaluation.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "nr_eval")]
    pub nr_eval: usize,

    #[serde(default = "num_workers")]
    pub num_workers: usize,

    #[serde(default = "epsilon")]
    pub epsilon: f64,

    #[serde(default = "time_ceiling_secs")]
    pub time_ceiling_secs: u64,

    #[serde(default = "decay")]
    pub decay: f64,

    #[serde(default = "min_episodes")]
    pub min_episodes: usize,

    #[serde(default = "seed")]
    pub seed: u64
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            nr_eval: nr_eval(),
            num_workers: num_workers(),
            epsilon: epsilon(),
            time_ceiling_secs: time_ceiling_secs(),
            decay: decay(),
            min_episodes: min_episodes(),
            seed: seed()
        }
    }
}

fn nr_eval () -> usize 
{
    50
}

///
/// Zero picks a worker count from the machine's parallelism.
///
fn num_workers () -> usize 
{
    0
}

fn epsilon () -> f64 
{
    0.01
}

fn time_ceiling_secs () -> u64 
{
    8 * 60
}

fn decay () -> f64 
{
    0.89
}

fn min_episodes () -> usize 
{
    1
}

fn seed () -> u64 
{
    7
}

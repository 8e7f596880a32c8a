
use utils::{Serialize, Deserialize};

///
/// Where a trainer takes its batches from.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode 
{
    ///
    /// Pull every batch synchronously from the dataflow.
    ///
    Simple,

    ///
    /// Prefetch batches on a background thread into a bounded queue.
    ///
    Queue
}

///
/// A configuration for the training loop.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "input")]
    pub input: InputMode,

    #[serde(default = "queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default = "max_epoch")]
    pub max_epoch: usize,

    #[serde(default = "steps_per_epoch")]
    pub steps_per_epoch: usize,

    #[serde(default = "batches_per_pass")]
    pub batches_per_pass: usize,

    #[serde(default = "explore")]
    pub explore: f64,

    #[serde(default = "cost_decay")]
    pub cost_decay: f32
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            input: input(),
            queue_capacity: queue_capacity(),
            max_epoch: max_epoch(),
            steps_per_epoch: steps_per_epoch(),
            batches_per_pass: batches_per_pass(),
            explore: explore(),
            cost_decay: cost_decay()
        }
    }
}

fn input () -> InputMode 
{
    InputMode::Queue
}

fn queue_capacity () -> usize 
{
    50
}

fn max_epoch () -> usize 
{
    10
}

fn steps_per_epoch () -> usize 
{
    200
}

fn batches_per_pass () -> usize 
{
    100
}

fn explore () -> f64 
{
    0.3
}

fn cost_decay () -> f32 
{
    0.95
}


use utils::{Serialize, Deserialize};

///
/// A configuration for the policy network and its optimizer.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "path")]
    pub path: String,

    #[serde(default = "best")]
    pub best: String,

    #[serde(default = "learning_rate")]
    pub learning_rate: f32,

    #[serde(default = "batch_size")]
    pub batch_size: usize,

    #[serde(default = "seed")]
    pub seed: u64
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            path: path(),
            best: best(),
            learning_rate: learning_rate(),
            batch_size: batch_size(),
            seed: seed()
        }
    }
}

impl Config 
{
    ///
    /// Returns the path of the saved weights.
    ///
    pub fn weights_path (& self) -> String 
    {
        format!("{}/trained/{}", self.path, self.best)
    }
}

fn path () -> String 
{
    "models".to_owned()
}

fn best () -> String 
{
    "best.json".to_owned()
}

fn learning_rate () -> f32 
{
    0.5
}

fn batch_size () -> usize 
{
    64
}

fn seed () -> u64 
{
    2016
}

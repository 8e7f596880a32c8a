
use utils::{Serialize, Deserialize};

pub use arcade::CatchConfig as GameConfig;
pub use crate::eval::config::Config as EvalConfig;
pub use crate::neural::config::Config as NeuralConfig;
pub use crate::train::config::Config as TrainConfig;

///
/// Represents a full configuration.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default)]
    pub train: TrainConfig,

    #[serde(default)]
    pub neural: NeuralConfig,

    #[serde(default)]
    pub eval: EvalConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default = "log_path")]
    pub log_path: String,

    #[serde(default = "log_level")]
    pub log_level: String
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            train: TrainConfig::default(),
            neural: NeuralConfig::default(),
            eval: EvalConfig::default(),
            game: GameConfig::default(),
            log_path: log_path(),
            log_level: log_level()
        }
    }
}

///
/// Returns the default log path.
///
fn log_path () -> String 
{
    "logs".to_owned()
}

///
/// Returns the default log specification.
///
fn log_level () -> String 
{
    "info".to_owned()
}

pub mod budget;
pub mod config;
pub mod driver;
pub mod episode;
pub mod evaluator;
pub mod stat;

pub use budget::EpisodeBudget;
pub use config::Config as EvalConfig;
pub use driver::{default_num_workers, eval_model_multithread, eval_with_funcs, EvalSummary};
pub use episode::{play_model, play_one_episode};
pub use evaluator::Evaluator;
pub use stat::StatCounter;

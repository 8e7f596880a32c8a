pub mod callback;
pub mod config;
pub mod saver;
pub mod summary;
pub mod trainer;

pub use callback::{Callback, TrainContext};
pub use config::{Config as TrainConfig, InputMode};
pub use saver::ModelSaver;
pub use summary::SummaryWriter;
pub use trainer::Trainer;

pub mod config;
pub mod model;
pub mod network;

pub use model::{Model, OnlinePredictor, PredictFn};
pub use network::PolicyNetwork;

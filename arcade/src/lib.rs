pub mod action;
pub mod catch;
pub mod player;

pub use action::ActionSpace;
pub use catch::{Catch, CatchConfig};
pub use player::{Player, PlayerFactory};


use crate::neural::PolicyNetwork;

use super::callback::{Callback, TrainContext};

use utils::error::*;
use utils::log;

///
/// Saves the policy weights at the end of every epoch.
///
#[derive(Clone, Debug)]
pub struct ModelSaver 
{
    path: String
}

impl ModelSaver 
{
    ///
    /// Creates a saver that overwrites the given weights file.
    ///
    pub fn new (path: impl Into<String>) -> ModelSaver 
    {
        ModelSaver { path: path.into() }
    }
}

impl Callback<PolicyNetwork> for ModelSaver 
{
    fn trigger_epoch (& mut self, ctx: & mut TrainContext<PolicyNetwork>) -> Result<()>
    {
        let model = ctx.model().read().map_err(|_| error!("The model lock was poisoned by a failed step."))?;
        model.save(& self.path)?;

        log::info!("Model saved to '{}' at global step {}.", self.path, ctx.global_step);
        Ok(())
    }
}


use crate::neural::{Model, OnlinePredictor};
use crate::sync::Coordinator;

use super::summary::SummaryWriter;

use std::sync::{Arc, RwLock};

use utils::error::*;

///
/// The trainer state a callback gets to see.
///
pub struct TrainContext<'a, M>
{
    pub epoch: usize,
    pub global_step: u64,

    model: & 'a Arc<RwLock<M>>,
    coord: & 'a Coordinator,
    summary: & 'a mut SummaryWriter
}

impl<'a, M: Model> TrainContext<'a, M>
{
    ///
    /// Returns the coordinator shared by the threads of this trainer.
    ///
    pub fn coordinator (& self) -> & Coordinator 
    {
        self.coord
    }

    ///
    /// Returns an inference function over the live model.
    ///
    pub fn get_predict_func (& self) -> OnlinePredictor<M>
    {
        OnlinePredictor::new(self.model.clone())
    }

    ///
    /// Returns `n` inference functions over the live model.
    ///
    pub fn get_predict_funcs (& self, n: usize) -> Vec<OnlinePredictor<M>>
    {
        (0 .. n).map(|_| self.get_predict_func()).collect()
    }

    ///
    /// Returns the shared handle to the live model.
    ///
    pub fn model (& self) -> & Arc<RwLock<M>>
    {
        self.model
    }

    pub(crate) fn new (epoch: usize, global_step: u64, model: & 'a Arc<RwLock<M>>, coord: & 'a Coordinator, summary: & 'a mut SummaryWriter) -> TrainContext<'a, M>
    {
        TrainContext { epoch, global_step, model, coord, summary }
    }

    ///
    /// Records a scalar for the current epoch.
    ///
    pub fn write_scalar_summary (& mut self, name: & str, value: f64) -> Result<()>
    {
        self.summary.write_scalar_summary(name, value)
    }
}

///
/// A hook into the training loop.
///
/// An error returned from any hook ends training through the regular 
/// shutdown path, and is then returned from `Trainer::train`.
///
pub trait Callback<M: Model>
{
    ///
    /// Runs once, after the input pipeline is up and before the first step.
    ///
    fn before_train (& mut self, _ctx: & mut TrainContext<M>) -> Result<()>
    {
        Ok(())
    }

    ///
    /// Runs at the end of every epoch.
    ///
    fn trigger_epoch (& mut self, _ctx: & mut TrainContext<M>) -> Result<()>
    {
        Ok(())
    }

    ///
    /// Runs once, after the input pipeline has been shut down.
    ///
    fn after_train (& mut self, _ctx: & mut TrainContext<M>) -> Result<()>
    {
        Ok(())
    }
}

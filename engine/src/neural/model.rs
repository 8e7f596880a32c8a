
use std::sync::{Arc, RwLock};

use utils::error::*;

///
/// A trainable model: one optimizer step per batch, and batched inference.
///
pub trait Model : Send + Sync + 'static 
{
    type Batch : Send + 'static;

    ///
    /// Runs exactly one optimizer step on the batch and returns its cost.
    ///
    fn train_step (& mut self, batch: & Self::Batch) -> Result<f32>;

    ///
    /// Maps a batch of observations to a batch of action distributions.
    ///
    fn predict (& self, inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>;
}

///
/// An inference function that may be called from many threads at once.
///
pub trait PredictFn : Send + Sync 
{
    fn predict (& self, inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>;
}

impl<F> PredictFn for F 
    where F: Fn(& [Vec<f32>]) -> Result<Vec<Vec<f32>>> + Send + Sync 
{
    fn predict (& self, inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>
    {
        self(inputs)
    }
}

///
/// Runs inference on the live model that a trainer keeps updating.
///
/// Every call takes a read lock, so predictions always see the weights of 
/// a completed step and never a half-applied one.
///
#[derive(Debug)]
pub struct OnlinePredictor<M>
{
    model: Arc<RwLock<M>>
}

impl<M> Clone for OnlinePredictor<M>
{
    fn clone (& self) -> OnlinePredictor<M>
    {
        OnlinePredictor { model: self.model.clone() }
    }
}

impl<M: Model> OnlinePredictor<M>
{
    ///
    /// Creates a predictor over the shared model.
    ///
    pub fn new (model: Arc<RwLock<M>>) -> OnlinePredictor<M>
    {
        OnlinePredictor { model }
    }
}

impl<M: Model> PredictFn for OnlinePredictor<M>
{
    fn predict (& self, inputs: & [Vec<f32>]) -> Result<Vec<Vec<f32>>>
    {
        let model = self.model.read().map_err(|_| error!("The model lock was poisoned by a failed step."))?;
        model.predict(inputs)
    }
}

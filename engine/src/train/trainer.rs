
use crate::dataflow::{DataFlow, RepeatedData};
use crate::neural::{Model, OnlinePredictor};
use crate::sync::{BoundedQueue, Coordinator, QueueError, StopToken, StoppableThread};

use super::callback::{Callback, TrainContext};
use super::config::{Config as TrainConfig, InputMode};
use super::summary::SummaryWriter;

use std::sync::{Arc, RwLock};
use std::time::Instant;

use utils::error::*;
use utils::log;

///
/// Runs the training loop of a model over a dataflow.
///
/// In `Simple` input mode every step pulls its batch from the dataflow on 
/// the training thread. In `Queue` mode an enqueue thread keeps a bounded 
/// queue filled and every step pops exactly one batch from it, so that 
/// data loading overlaps with the optimizer steps.
///
pub struct Trainer<M: Model, D: DataFlow<Datapoint = M::Batch>>
{
    config: TrainConfig,
    model: Arc<RwLock<M>>,
    dataset: Option<D>,
    callbacks: Vec<Box<dyn Callback<M>>>,
    coord: Coordinator,
    summary: SummaryWriter,

    global_step: u64,
    cost: Option<f32>
}

///
/// The batches of one training run.
///
enum Input<D: DataFlow>
{
    Direct(RepeatedData<D>),
    Queued { queue: Arc<BoundedQueue<D::Datapoint>>, feeder: StoppableThread }
}

impl<D: DataFlow + 'static> Input<D>
{
    ///
    /// Returns the next batch, or `None` once the input has been shut down.
    ///
    fn next (& mut self) -> Result<Option<D::Datapoint>>
    {
        match self 
        {
            Input::Direct(data) => data.get_data(),
            Input::Queued { queue, .. } => match queue.pop()
            {
                Ok(dp) => Ok(Some(dp)),
                Err(QueueError::Closed) => Ok(None),
                Err(e) => Err(e.into())
            }
        }
    }

    fn shutdown (& mut self) -> Result<()>
    {
        if let Input::Queued { queue, feeder } = self 
        {
            queue.close();
            feeder.stop();
            feeder.join()?;
        }

        Ok(())
    }
}

///
/// Closes the queue and stops the coordinator when the enqueue thread 
/// leaves its loop, whether it returns, fails, or panics.
///
struct EnqueueCleanup<T>
{
    queue: Arc<BoundedQueue<T>>,
    coord: Coordinator
}

impl<T> Drop for EnqueueCleanup<T>
{
    fn drop (& mut self)
    {
        self.queue.close();
        self.coord.request_stop();
        log::info!("Enqueue thread exited.");
    }
}

///
/// The body of the enqueue thread.
///
fn enqueue_loop<D: DataFlow> (ds: D, queue: Arc<BoundedQueue<D::Datapoint>>, coord: Coordinator, token: StopToken) -> Result<()>
{
    let _cleanup = EnqueueCleanup { queue: queue.clone(), coord: coord.clone() };

    let mut data = RepeatedData::forever(ds);
    data.reset_state();

    loop 
    {
        if coord.should_stop() || token.stopped()
        {
            return Ok(());
        }

        let dp = match data.get_data().context("Exception in enqueue thread.")?
        {
            Some(dp) => dp,
            None     => return Ok(())
        };

        match queue.push(dp)
        {
            Ok(()) => {},
            Err(QueueError::Cancelled) => 
            {
                log::info!("Enqueue cancelled: the input queue was closed.");
                return Ok(());
            },
            Err(e) => return Err(e).context("Exception in enqueue thread.")
        }
    }
}

impl<M, D> Trainer<M, D>
    where M: Model, D: DataFlow<Datapoint = M::Batch> + 'static
{
    ///
    /// Returns the coordinator of this trainer; requesting a stop on it 
    /// ends training at the next step.
    ///
    pub fn coordinator (& self) -> Coordinator 
    {
        self.coord.clone()
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
    /// Returns the number of optimizer steps run so far.
    ///
    pub fn global_step (& self) -> u64 
    {
        self.global_step
    }

    ///
    /// Returns the shared handle to the model.
    ///
    pub fn model (& self) -> Arc<RwLock<M>>
    {
        self.model.clone()
    }

    ///
    /// Creates a trainer; nothing runs until `train` is called.
    ///
    pub fn new (config: TrainConfig, model: M, dataset: D, summary: SummaryWriter) -> Trainer<M, D>
    {
        Trainer 
        {
            config,
            model: Arc::new(RwLock::new(model)),
            dataset: Some(dataset),
            callbacks: Vec::new(),
            coord: Coordinator::new(),
            summary,
            global_step: 0,
            cost: None
        }
    }

    ///
    /// Runs exactly one optimizer step on the batch.
    ///
    pub fn run_step (& mut self, batch: & M::Batch) -> Result<f32>
    {
        let cost = 
        {
            let mut model = self.model.write().map_err(|_| error!("The model lock was poisoned by a failed step."))?;
            model.train_step(batch)?
        };
        self.global_step += 1;

        let decay = self.config.cost_decay;
        self.cost = Some(match self.cost 
        {
            Some(avg) => decay * avg + (1.0 - decay) * cost,
            None      => cost
        });

        Ok(cost)
    }

    ///
    /// Returns the summaries written so far.
    ///
    pub fn summary (& self) -> & SummaryWriter 
    {
        & self.summary
    }

    ///
    /// Trains for the configured number of epochs, or until stopped.
    ///
    /// Can only be called once, since the dataflow is handed to the input 
    /// pipeline.
    ///
    pub fn train (& mut self) -> Result<()>
    {
        let ds = self.dataset.take().ok_or_else(|| error!("This trainer has already been run."))?;

        let mut input = match self.config.input 
        {
            InputMode::Simple => Input::Direct(RepeatedData::forever(ds)),
            InputMode::Queue  => self.start_enqueue_thread(ds)?
        };
        if let Input::Direct(data) = & mut input 
        {
            data.reset_state();
        }

        self.main_loop(& mut input)
    }

    ///
    /// Registers a callback.
    ///
    pub fn with_callback (mut self, callback: impl Callback<M> + 'static) -> Trainer<M, D>
    {
        self.callbacks.push(Box::new(callback));
        self
    }

    fn for_each_callback<F> (& mut self, epoch: usize, callbacks: & mut [Box<dyn Callback<M>>], mut hook: F) -> Result<()>
        where F: FnMut(& mut dyn Callback<M>, & mut TrainContext<M>) -> Result<()>
    {
        let mut ctx = TrainContext::new(epoch, self.global_step, & self.model, & self.coord, & mut self.summary);
        for callback in callbacks.iter_mut()
        {
            hook(callback.as_mut(), & mut ctx)?;
        }

        Ok(())
    }

    fn main_loop (& mut self, input: & mut Input<D>) -> Result<()>
    {
        let mut callbacks = std::mem::take(& mut self.callbacks);

        let outcome = self.run_epochs(input, & mut callbacks);
        if let Err(e) = & outcome 
        {
            log::error!("Training failed: {:#}", e);
        }

        // Shut the input down before the final hooks, whatever happened.

        self.coord.request_stop();
        let shutdown = input.shutdown();

        let epoch = self.summary_epoch();
        let after = self.for_each_callback(epoch, & mut callbacks, |cb, ctx| cb.after_train(ctx));
        self.callbacks = callbacks;

        log::info!("Training finished at global step {}.", self.global_step);
        outcome.and(shutdown).and(after)
    }

    fn run_epochs (& mut self, input: & mut Input<D>, callbacks: & mut [Box<dyn Callback<M>>]) -> Result<()>
    {
        self.for_each_callback(0, callbacks, |cb, ctx| cb.before_train(ctx))?;

        for epoch in 1 ..= self.config.max_epoch 
        {
            let start = Instant::now();
            for _ in 0 .. self.config.steps_per_epoch 
            {
                if self.coord.should_stop()
                {
                    log::info!("Stop requested at global step {}.", self.global_step);
                    return Ok(());
                }

                let batch = match input.next()?
                {
                    Some(batch) => batch,
                    None => 
                    {
                        log::warn!("Input closed at global step {}.", self.global_step);
                        return Ok(());
                    }
                };
                self.run_step(& batch)?;
            }

            log::info!("Epoch {} (global_step {}) finished, time: {:.2} sec.", epoch, self.global_step, start.elapsed().as_secs_f64());
            self.trigger_epoch(epoch, callbacks)?;
        }

        Ok(())
    }

    fn start_enqueue_thread (& mut self, ds: D) -> Result<Input<D>>
    {
        let queue = Arc::new(BoundedQueue::new(self.config.queue_capacity).context("Invalid input queue capacity.")?);

        let mut feeder = StoppableThread::new("enqueue");
        {
            let queue = queue.clone();
            let coord = self.coord.clone();
            feeder.start(move |token| enqueue_loop(ds, queue, coord, token))?;
        }

        Ok(Input::Queued { queue, feeder })
    }

    fn summary_epoch (& self) -> usize 
    {
        (self.global_step / self.config.steps_per_epoch.max(1) as u64) as usize
    }

    fn trigger_epoch (& mut self, epoch: usize, callbacks: & mut [Box<dyn Callback<M>>]) -> Result<()>
    {
        self.summary.set_position(epoch, self.global_step);
        if let Some(cost) = self.cost 
        {
            self.summary.write_scalar_summary("cost", cost as f64)?;
        }

        self.for_each_callback(epoch, callbacks, |cb, ctx| cb.trigger_epoch(ctx))
    }
}

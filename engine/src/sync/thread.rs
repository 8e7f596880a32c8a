
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::queue::{BoundedQueue, PushTimeoutError};

use utils::error::*;
use utils::log;

///
/// How long a stoppable put waits on a full queue before it checks the 
/// stop flag again.
///
pub const PUT_POLL_INTERVAL : Duration = Duration::from_millis(100);

///
/// The lifecycle of a stoppable thread.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState 
{
    Created,
    Running,
    StopRequested,
    Stopped
}

///
/// The thread-side view of a stop flag: checked at the top of every unit 
/// of work and while blocked on a full queue.
///
#[derive(Clone, Debug, Default)]
pub struct StopToken 
{
    flag: Arc<AtomicBool>
}

impl StopToken 
{
    ///
    /// Pushes into the queue unless a stop is requested first.
    ///
    /// Returns true if the item was inserted. Returns false, without 
    /// inserting, if the thread was asked to stop while waiting for room, 
    /// or if the queue was closed.
    ///
    pub fn queue_put_stoppable<T> (& self, queue: & BoundedQueue<T>, item: T) -> bool 
    {
        let mut item = item;
        loop 
        {
            if self.stopped()
            {
                return false;
            }

            match queue.push_timeout(item, PUT_POLL_INTERVAL)
            {
                Ok(()) => return true,
                Err(PushTimeoutError::Timeout(back)) => item = back,
                Err(PushTimeoutError::Cancelled(_)) => return false
            }
        }
    }

    ///
    /// Returns whether a stop has been requested.
    ///
    pub fn stopped (& self) -> bool 
    {
        self.flag.load(Ordering::SeqCst)
    }

    fn stop (& self)
    {
        self.flag.store(true, Ordering::SeqCst);
    }
}

///
/// An OS thread with a cooperative stop flag.
///
/// The body receives a `StopToken` and is expected to poll it between 
/// units of work. Errors returned by the body and panics raised inside it 
/// are logged on the thread itself, so a failing worker only ends its own 
/// contribution.
///
#[derive(Debug)]
pub struct StoppableThread 
{
    name: String,
    token: StopToken,
    handle: Option<JoinHandle<()>>,
    started: bool,
    joined: bool
}

impl StoppableThread 
{
    ///
    /// Returns whether the thread body has returned, by any means.
    ///
    pub fn is_finished (& self) -> bool 
    {
        match & self.handle 
        {
            Some(handle) => handle.is_finished(),
            None         => self.started
        }
    }

    ///
    /// Waits for the thread to exit. Joining again is a no-op.
    ///
    pub fn join (& mut self) -> Result<()>
    {
        if let Some(handle) = self.handle.take()
        {
            handle.join().map_err(|_| error!("Thread '{}' could not be joined.", self.name))?;
        }
        self.joined = self.started;

        Ok(())
    }

    ///
    /// Returns this thread's name.
    ///
    pub fn name (& self) -> & str 
    {
        & self.name
    }

    ///
    /// Creates a thread that is not running yet.
    ///
    pub fn new (name: impl Into<String>) -> StoppableThread 
    {
        StoppableThread { name: name.into(), token: StopToken::default(), handle: None, started: false, joined: false }
    }

    ///
    /// Spawns the thread on the given body.
    ///
    pub fn start<F> (& mut self, body: F) -> Result<()>
        where F: FnOnce(StopToken) -> Result<()> + Send + 'static
    {
        ensure!(! self.started, "Thread '{}' has already been started.", self.name);

        let name = self.name.clone();
        let token = self.token.clone();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || 
            {
                match panic::catch_unwind(AssertUnwindSafe(|| body(token)))
                {
                    Ok(Ok(())) => log::debug!("Thread '{}' exited.", name),
                    Ok(Err(e)) => log::error!("Exception in thread '{}': {:#}", name, e),
                    Err(cause) => log::error!("Thread '{}' panicked: {}", name, panic_message(& cause))
                }
            })
            .with_context(|| format!("Failed to spawn thread '{}'.", self.name))?;

        self.handle = Some(handle);
        self.started = true;

        Ok(())
    }

    ///
    /// Returns the current lifecycle state.
    ///
    pub fn state (& self) -> WorkerState 
    {
        if ! self.started 
        {
            WorkerState::Created
        }
        else if self.joined || self.is_finished()
        {
            WorkerState::Stopped
        }
        else if self.token.stopped()
        {
            WorkerState::StopRequested
        }
        else 
        {
            WorkerState::Running
        }
    }

    ///
    /// Asks the thread to stop at its next poll point. Safe to call any 
    /// number of times, from any thread.
    ///
    pub fn stop (& self)
    {
        self.token.stop();
    }

    ///
    /// Returns whether a stop has been requested.
    ///
    pub fn stopped (& self) -> bool 
    {
        self.token.stopped()
    }
}

impl Drop for StoppableThread 
{
    fn drop (& mut self)
    {
        self.stop();
        if let Err(e) = self.join()
        {
            log::error!("{:#}", e);
        }
    }
}

fn panic_message (cause: & Box<dyn Any + Send>) -> String 
{
    if let Some(s) = cause.downcast_ref::<& str>()
    {
        (* s).to_owned()
    }
    else if let Some(s) = cause.downcast_ref::<String>()
    {
        s.clone()
    }
    else 
    {
        "unknown cause".to_owned()
    }
}

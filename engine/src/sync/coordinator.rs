
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

///
/// A stop signal shared by a set of cooperating threads.
///
/// Clones refer to the same signal. Once requested, a stop is never 
/// withdrawn.
///
#[derive(Clone, Debug, Default)]
pub struct Coordinator 
{
    inner: Arc<Signal>
}

#[derive(Debug, Default)]
struct Signal 
{
    mutex: Mutex<bool>,
    latch: Condvar
}

impl Coordinator 
{
    ///
    /// Creates a coordinator on which no stop has been requested.
    ///
    pub fn new () -> Coordinator 
    {
        Coordinator::default()
    }

    ///
    /// Requests every thread sharing this coordinator to stop.
    ///
    pub fn request_stop (& self)
    {
        let mut stopped = self.inner.mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        (* stopped) = true;
        self.inner.latch.notify_all();
    }

    ///
    /// Returns whether a stop has been requested.
    ///
    pub fn should_stop (& self) -> bool 
    {
        * self.inner.mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    ///
    /// Waits until a stop is requested or the timeout elapses, and returns 
    /// whether a stop has been requested.
    ///
    pub fn wait_timeout (& self, timeout: Duration) -> bool 
    {
        let deadline = Instant::now() + timeout;

        let mut stopped = self.inner.mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        while ! (* stopped)
        {
            let now = Instant::now();
            if now >= deadline 
            {
                break;
            }

            stopped = self.inner.latch.wait_timeout(stopped, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }

        * stopped
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use std::thread;

    #[test]
    fn stop_is_shared_between_clones () 
    {
        let coord = Coordinator::new();
        let other = coord.clone();

        assert!(! other.should_stop());
        coord.request_stop();
        coord.request_stop();
        assert!(other.should_stop());
    }

    #[test]
    fn wait_times_out_without_a_stop () 
    {
        let coord = Coordinator::new();
        assert!(! coord.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn wait_wakes_on_stop () 
    {
        let coord = Coordinator::new();
        let waiter = 
        {
            let coord = coord.clone();
            thread::spawn(move || coord.wait_timeout(Duration::from_secs(30)))
        };

        thread::sleep(Duration::from_millis(20));
        coord.request_stop();

        assert!(waiter.join().unwrap_or(false));
    }
}

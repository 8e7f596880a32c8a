
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thiserror::Error;

use utils::error::*;

///
/// The expected ways in which a queue operation does not go through.
///
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum QueueError 
{
    #[error("the enqueue was cancelled because the queue is closed")]
    Cancelled,

    #[error("the queue is closed and has been drained")]
    Closed,

    #[error("the queue operation timed out")]
    Timeout
}

///
/// A timed push that did not go through; the item is handed back.
///
#[derive(Debug, PartialEq, Eq)]
pub enum PushTimeoutError<T>
{
    Timeout(T),
    Cancelled(T)
}

impl<T> PushTimeoutError<T>
{
    ///
    /// Recovers the item that was not inserted.
    ///
    pub fn into_inner (self) -> T 
    {
        match self 
        {
            PushTimeoutError::Timeout(item)   => item,
            PushTimeoutError::Cancelled(item) => item
        }
    }

    ///
    /// Returns the matching queue error, dropping the item.
    ///
    pub fn kind (& self) -> QueueError 
    {
        match self 
        {
            PushTimeoutError::Timeout(_)   => QueueError::Timeout,
            PushTimeoutError::Cancelled(_) => QueueError::Cancelled
        }
    }
}

#[derive(Debug)]
struct State<T>
{
    items: VecDeque<T>,
    closed: bool
}

///
/// A fixed-capacity FIFO queue with blocking push and pop.
///
/// The queue can be closed, after which every pending and future push is 
/// cancelled; pops keep draining what is left and then report `Closed`.
/// No item is ever dropped or delivered twice.
///
#[derive(Debug)]
pub struct BoundedQueue<T>
{
    capacity: usize,
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar
}

impl<T> BoundedQueue<T>
{
    ///
    /// Returns the maximum number of items the queue holds.
    ///
    pub fn capacity (& self) -> usize 
    {
        self.capacity
    }

    ///
    /// Closes the queue for insertion and cancels all pending pushes.
    ///
    pub fn close (& self)
    {
        let mut state = self.lock();
        state.closed = true;

        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    ///
    /// Returns whether the queue has been closed.
    ///
    pub fn is_closed (& self) -> bool 
    {
        self.lock().closed
    }

    ///
    /// Creates an empty queue holding at most `capacity` items.
    ///
    pub fn new (capacity: usize) -> Result<BoundedQueue<T>>
    {
        ensure!(capacity > 0, "A bounded queue needs a capacity of at least 1.");

        Ok(BoundedQueue 
        {
            capacity,
            state: Mutex::new(State { items: VecDeque::with_capacity(capacity), closed: false }),
            not_empty: Condvar::new(),
            not_full: Condvar::new()
        })
    }

    ///
    /// Removes and returns the oldest item, blocking while the queue is empty.
    ///
    pub fn pop (& self) -> std::result::Result<T, QueueError>
    {
        let mut state = self.lock();
        loop 
        {
            if let Some(item) = state.items.pop_front()
            {
                self.not_full.notify_one();
                return Ok(item);
            }
            if state.closed 
            {
                return Err(QueueError::Closed);
            }

            state = self.not_empty.wait(state).unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    ///
    /// Like `pop`, but gives up once `timeout` has elapsed.
    ///
    pub fn pop_timeout (& self, timeout: Duration) -> std::result::Result<T, QueueError>
    {
        let deadline = Instant::now() + timeout;

        let mut state = self.lock();
        loop 
        {
            if let Some(item) = state.items.pop_front()
            {
                self.not_full.notify_one();
                return Ok(item);
            }
            if state.closed 
            {
                return Err(QueueError::Closed);
            }

            let now = Instant::now();
            if now >= deadline 
            {
                return Err(QueueError::Timeout);
            }

            state = self.not_empty.wait_timeout(state, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }

    ///
    /// Appends an item, blocking while the queue is full.
    ///
    pub fn push (& self, item: T) -> std::result::Result<(), QueueError>
    {
        let mut state = self.lock();
        loop 
        {
            if state.closed 
            {
                return Err(QueueError::Cancelled);
            }
            if state.items.len() < self.capacity 
            {
                state.items.push_back(item);
                self.not_empty.notify_one();
                return Ok(());
            }

            state = self.not_full.wait(state).unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    ///
    /// Like `push`, but gives up once `timeout` has elapsed and hands the 
    /// item back.
    ///
    pub fn push_timeout (& self, item: T, timeout: Duration) -> std::result::Result<(), PushTimeoutError<T>>
    {
        let deadline = Instant::now() + timeout;

        let mut state = self.lock();
        loop 
        {
            if state.closed 
            {
                return Err(PushTimeoutError::Cancelled(item));
            }
            if state.items.len() < self.capacity 
            {
                state.items.push_back(item);
                self.not_empty.notify_one();
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline 
            {
                return Err(PushTimeoutError::Timeout(item));
            }

            state = self.not_full.wait_timeout(state, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
    }

    ///
    /// Returns the number of items currently queued.
    ///
    pub fn size (& self) -> usize 
    {
        self.lock().items.len()
    }

    fn lock (& self) -> MutexGuard<'_, State<T>>
    {
        // The state is consistent between statements, so a panic elsewhere 
        // never leaves it half-updated.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn rejects_zero_capacity () 
    {
        assert!(BoundedQueue::<u32>::new(0).is_err());
    }

    #[test]
    fn delivers_in_fifo_order () -> Result<()>
    {
        let queue = BoundedQueue::new(4)?;
        for i in 0 .. 4 
        {
            queue.push(i)?;
        }

        let popped = (0 .. 4).map(|_| queue.pop()).collect::<std::result::Result<Vec<_>, _>>()?;
        assert_eq!(popped, vec![0, 1, 2, 3]);

        Ok(())
    }

    #[test]
    fn full_queue_times_out_and_returns_the_item () -> Result<()>
    {
        let queue = BoundedQueue::new(1)?;
        queue.push("first")?;

        let err = queue.push_timeout("second", Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.kind(), QueueError::Timeout);
        assert_eq!(err.into_inner(), "second");
        assert_eq!(queue.size(), 1);

        Ok(())
    }

    #[test]
    fn empty_queue_times_out () -> Result<()>
    {
        let queue = BoundedQueue::<u8>::new(1)?;
        assert_eq!(queue.pop_timeout(Duration::from_millis(10)), Err(QueueError::Timeout));
        Ok(())
    }

    #[test]
    fn close_cancels_a_blocked_push () -> Result<()>
    {
        let queue = Arc::new(BoundedQueue::new(1)?);
        queue.push(1)?;

        let pusher = 
        {
            let queue = queue.clone();
            thread::spawn(move || queue.push(2))
        };

        thread::sleep(Duration::from_millis(30));
        queue.close();

        let outcome = pusher.join().map_err(|_| error!("pusher panicked"))?;
        assert_eq!(outcome, Err(QueueError::Cancelled));
        assert_eq!(queue.push(3), Err(QueueError::Cancelled));

        // What was already queued is still delivered.

        assert_eq!(queue.pop(), Ok(1));
        assert_eq!(queue.pop(), Err(QueueError::Closed));

        Ok(())
    }

    #[test]
    fn close_wakes_a_blocked_pop () -> Result<()>
    {
        let queue = Arc::new(BoundedQueue::<u32>::new(2)?);

        let popper = 
        {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        };

        thread::sleep(Duration::from_millis(30));
        queue.close();
        queue.close();

        let outcome = popper.join().map_err(|_| error!("popper panicked"))?;
        assert_eq!(outcome, Err(QueueError::Closed));
        assert!(queue.is_closed());

        Ok(())
    }

    #[test]
    fn size_never_exceeds_capacity_under_contention () -> Result<()>
    {
        const CAPACITY : usize = 3;
        const PRODUCERS : usize = 4;
        const PER_PRODUCER : usize = 200;

        let queue = Arc::new(BoundedQueue::new(CAPACITY)?);
        let peak = Arc::new(AtomicUsize::new(0));

        let producers = (0 .. PRODUCERS).map(|p| 
        {
            let queue = queue.clone();
            let peak = peak.clone();
            thread::spawn(move || 
            {
                for i in 0 .. PER_PRODUCER 
                {
                    queue.push((p, i)).ok();
                    peak.fetch_max(queue.size(), Ordering::SeqCst);
                }
            })
        }).collect::<Vec<_>>();

        let mut last_seen = vec![None; PRODUCERS];
        for _ in 0 .. PRODUCERS * PER_PRODUCER 
        {
            let (p, i) = queue.pop()?;
            peak.fetch_max(queue.size(), Ordering::SeqCst);

            // Items of a single producer keep their order.

            assert!(last_seen[p].map_or(true, |last| last < i));
            last_seen[p] = Some(i);
        }

        for producer in producers 
        {
            producer.join().map_err(|_| error!("producer panicked"))?;
        }

        assert!(peak.load(Ordering::SeqCst) <= CAPACITY);
        assert_eq!(queue.size(), 0);

        Ok(())
    }
}

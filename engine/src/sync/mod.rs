pub mod coordinator;
pub mod queue;
pub mod thread;

pub use coordinator::Coordinator;
pub use queue::{BoundedQueue, PushTimeoutError, QueueError};
pub use thread::{StopToken, StoppableThread, WorkerState};

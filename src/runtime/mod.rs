//! Concurrency core: a bounded pool shared by every connection, cooperative
//! cancellation, and the orchestrator that wraps each request in its two
//! deadlines.

pub mod cancel;
pub mod orchestrator;
pub mod pool;

pub use cancel::{CancelFlag, Cancelled};
pub use orchestrator::Orchestrator;
pub use pool::{ComputationPool, PoolError};

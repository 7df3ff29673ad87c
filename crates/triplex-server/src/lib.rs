//! # triplex-server: the replica daemon
//!
//! Wires the pure state machine (`triplex-replica`) to a TCP listener and a
//! fixed worker pool. All the interesting logic — leader self-promotion,
//! forward-then-apply, durability — lives in [`handler::dispatch`] and
//! [`replica_handle::ReplicaHandle`]; this crate's job is to get bytes off
//! the wire and into that path.

mod bounded_queue;
mod error;
mod handler;
mod listener;
mod replica_handle;
mod worker_pool;

pub use error::{ServerError, ServerResult};
pub use handler::{dispatch, CALL_DEADLINE};
pub use listener::serve;
pub use replica_handle::ReplicaHandle;
pub use worker_pool::{WorkerPool, WorkerPoolConfig};

//! DataWorker actors and the channel the coordinator talks to them through.

pub mod call;
mod channel;
mod manager;
mod request;
mod worker;

pub use channel::WorkerChannel;
pub use manager::{DEFAULT_QUEUE_DEPTH, WorkerPool};
pub use request::{Reply, WorkRequest};
pub use worker::worker_loop;

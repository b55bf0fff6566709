#![doc = include_str!("../README.md")]

pub mod config;
pub mod coordinator;
pub mod driver;
pub mod pool;
pub mod telemetry;
pub mod view;

pub use crate::coordinator::{Coordinator, CoordinatorConfig, Intent, TableHandle};
pub use crate::pool::{WorkerChannel, WorkerPool};
pub use crate::view::{Notice, NoticeKind, ViewSnapshot};

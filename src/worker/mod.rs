//! Bounded I/O workers for per-part operations.
//!
//! - [`WorkerPool`] - Synchronous scatter/gather batches over a rayon pool
//! - [`save_part`], [`load_part`], [`remove_part`] - What a worker does per item

mod codec;
mod pool;

pub use codec::{load_part, remove_part, save_part};
pub use pool::{LoadItem, SaveItem, WorkerPool};

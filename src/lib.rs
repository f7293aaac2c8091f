//! partstore
//!
//! Chunked object storage for Rust.
//!
//! `partstore` splits files into fixed-size parts, compresses each part,
//! records a BLAKE3 digest of its uncompressed bytes, and writes it to its
//! own file under a parts directory. Parts are processed in batches by a
//! bounded I/O worker pool, and every batch of part data held in memory is
//! admitted against a global byte budget shared by all concurrent operations.
//!
//! The crate:
//! - keeps its file and part registries in memory only
//! - verifies every part on read and aborts on the first corrupt batch
//! - runs any number of puts, gets and deletes concurrently
//!
//! # Example
//!
//! ```no_run
//! use partstore::{Store, StoreConfig};
//!
//! fn main() -> partstore::Result<()> {
//!     let store = Store::open(StoreConfig::load("config.yaml")?)?;
//!
//!     let id = store.put("data.bin")?;
//!     for (id, name) in store.list() {
//!         println!("{id} {}", name.display());
//!     }
//!     store.get_into(id, "data.restored")?;
//!     store.delete(id)?;
//!
//!     store.shutdown();
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod budget;
mod chunker;
mod config;
mod error;
mod part;
mod registry;
mod shell;
mod store;
mod worker;

mod buffer; // internal (per-worker reuse)
mod hash; // internal blake3 digests

//
// Public surface
//

pub use budget::{MemoryBudget, Reservation};
pub use chunker::PartReader;
pub use config::StoreConfig;
pub use error::{CommandError, Result, StoreError};
pub use part::{File, FileId, FilePart, PartHash, PartId};
pub use registry::{FileRegistry, IdAllocator, PartRegistry};
pub use shell::{Command, Shell};
pub use store::{DeleteReport, Store};
pub use worker::{LoadItem, SaveItem, WorkerPool};

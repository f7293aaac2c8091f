//! In-memory registries shared by all running pipelines.
//!
//! - [`IdAllocator`] - Strictly increasing ids under a bounded lock
//! - [`FileRegistry`] - File id to [`File`](crate::File)
//! - [`PartRegistry`] - File id to its ordered [`FilePart`](crate::FilePart) sequence
//!
//! Nothing here is persisted; a restart starts from empty registries.

mod files;
mod id;
mod parts;

pub use files::FileRegistry;
pub use id::IdAllocator;
pub use parts::PartRegistry;

//! Stored file and part records.
//!
//! - [`File`] - A stored file: id, name, readiness, part count
//! - [`FilePart`] - One fixed-size slice of a file
//! - [`PartHash`] - 32-byte digest of a part's uncompressed bytes

mod hash;
mod record;

pub use hash::PartHash;
pub use record::{File, FileId, FilePart, PartId};

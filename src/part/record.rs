//! File and part records kept by the registries.

use std::fmt;
use std::path::PathBuf;

use super::PartHash;

/// Identifier of a stored file.
pub type FileId = u64;

/// Identifier of a stored part.
pub type PartId = u64;

/// A stored file.
///
/// Registered with `ready == false` when a put begins; flipped to `true` with
/// `part_count` set once every part is durably written. A delete flips it back
/// to `false` before tearing the parts down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Allocator-assigned id.
    pub id: FileId,

    /// Source path on put, destination path on get.
    pub name: PathBuf,

    /// Complete and readable.
    pub ready: bool,

    /// Number of parts, set on completion.
    pub part_count: usize,
}

impl File {
    /// Creates an in-progress file record.
    pub fn new(id: FileId, name: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            ready: false,
            part_count: 0,
        }
    }
}

/// One fixed-size slice of a file.
///
/// The on-disk name is derived from `parent_id` and `index`, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Allocator-assigned id.
    pub id: PartId,

    /// Owning file.
    pub parent_id: FileId,

    /// Zero-based position within the file; defines reconstruction order.
    pub index: usize,

    /// Digest of the uncompressed bytes, set once written.
    pub hash: Option<PartHash>,

    /// Durably written.
    pub written: bool,
}

impl FilePart {
    /// Creates a pending part.
    pub fn new(id: PartId, parent_id: FileId, index: usize) -> Self {
        Self {
            id,
            parent_id,
            index,
            hash: None,
            written: false,
        }
    }

    /// Records a successful write.
    pub fn mark_written(&mut self, hash: PartHash) {
        self.hash = Some(hash);
        self.written = true;
    }

    /// File name of this part inside the parts directory: `<parent_id>_<index>.PART`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.PART", self.parent_id, self.index)
    }
}

impl fmt::Display for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Part({} #{} of file {}", self.id, self.index, self.parent_id)?;
        if let Some(hash) = self.hash {
            write!(f, ", hash={}", hash)?;
        }
        write!(f, ")")
    }
}

//! Splitting byte streams into parts.
//!
//! - [`PartReader`] - Fixed-size parts and batches from any `Read`

mod reader;

pub use reader::PartReader;

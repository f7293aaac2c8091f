//! Per-thread buffer reuse for the I/O workers.
//!
//! Each worker thread keeps a few scratch buffers for compressed part bytes
//! so steady-state batches do not allocate. Not part of the public API.

mod pool;

pub(crate) use pool::Buffer;

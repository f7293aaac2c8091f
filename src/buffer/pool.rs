//! Thread-local buffer pool for efficient memory reuse.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Default buffer size for pooled buffers.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024; // 16 KiB

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A reusable byte buffer.
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer from the thread-local pool or creates a new one.
    pub fn take() -> Self {
        THREAD_BUFFER_POOL.with(|pool| {
            let mut pool = pool.borrow_mut();
            if let Some(data) = pool.pop() {
                Self { data }
            } else {
                Self {
                    data: Vec::with_capacity(DEFAULT_BUFFER_SIZE),
                }
            }
        })
    }
}

impl Deref for Buffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.data
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // Oversized buffers are released rather than pinned to the thread
        if self.data.capacity() <= DEFAULT_BUFFER_SIZE * 2 {
            self.data.clear();
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::take()
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_take() {
        let buf = Buffer::take();
        assert!(buf.capacity() >= DEFAULT_BUFFER_SIZE);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_buffer_reuse() {
        {
            let mut buf = Buffer::take();
            buf.extend_from_slice(b"test data");
        }

        // Returned to the pool cleared, capacity kept
        let buf2 = Buffer::take();
        assert!(buf2.is_empty());
        assert!(buf2.capacity() >= DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_oversized_buffer_not_pooled() {
        {
            let mut buf = Buffer::take();
            buf.reserve(DEFAULT_BUFFER_SIZE * 4);
        }
        let buf = Buffer::take();
        assert!(buf.capacity() <= DEFAULT_BUFFER_SIZE * 2);
    }
}

//! Identifier allocation.

use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{Result, StoreError};

/// Issues strictly increasing ids starting at 0.
///
/// Acquisition of the counter is bounded by `timeout`; on expiry the caller
/// gets [`StoreError::LockTimeout`] instead of blocking indefinitely.
#[derive(Debug)]
pub struct IdAllocator {
    next: Mutex<u64>,
    timeout: Duration,
    resource: &'static str,
}

impl IdAllocator {
    /// Creates an allocator.
    ///
    /// # Arguments
    ///
    /// * `resource` - Name reported in lock timeouts (e.g. `"file id"`)
    /// * `timeout` - Bounded wait for the counter lock
    pub fn new(resource: &'static str, timeout: Duration) -> Self {
        Self {
            next: Mutex::new(0),
            timeout,
            resource,
        }
    }

    /// Returns the next id.
    pub fn next_id(&self) -> Result<u64> {
        let mut next = self
            .next
            .try_lock_for(self.timeout)
            .ok_or(StoreError::LockTimeout {
                resource: self.resource,
            })?;
        let id = *next;
        *next += 1;
        Ok(id)
    }

    /// Returns the id the next call would issue, without consuming it.
    pub fn peek(&self) -> u64 {
        *self.next.lock()
    }

    /// Holds the counter lock so callers time out.
    #[cfg(test)]
    pub(crate) fn hold(&self) -> parking_lot::MutexGuard<'_, u64> {
        self.next.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_starts_at_zero_and_increments() {
        let ids = IdAllocator::new("test id", Duration::from_millis(50));
        assert_eq!(ids.next_id().unwrap(), 0);
        assert_eq!(ids.next_id().unwrap(), 1);
        assert_eq!(ids.next_id().unwrap(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_unique_under_contention() {
        let ids = Arc::new(IdAllocator::new("test id", Duration::from_secs(5)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    (0..200)
                        .map(|_| ids.next_id().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {} issued twice", id);
            }
        }
        assert_eq!(seen.len(), 1600);
        assert_eq!(ids.peek(), 1600);
    }

    #[test]
    fn test_lock_timeout() {
        let ids = IdAllocator::new("part id", Duration::from_millis(20));
        let _held = ids.hold();
        let err = ids.next_id().unwrap_err();
        assert!(matches!(
            err,
            StoreError::LockTimeout {
                resource: "part id"
            }
        ));
    }
}

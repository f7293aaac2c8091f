//! Budget accounting and the reservation guard.
//!
//! A reservation is granted only while `usage + amount < limit`, so usage
//! stays strictly below the limit. Waiters block on a condition variable that
//! every release notifies; each wakeup re-checks the predicate. The wait is
//! sliced by `poll` and bounded overall by `deadline`.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
struct BudgetState {
    usage: u64,
    peak: u64,
}

/// A byte budget shared by every concurrent put and get.
#[derive(Debug)]
pub struct MemoryBudget {
    state: Mutex<BudgetState>,
    released: Condvar,
    limit: u64,
    poll: Duration,
    deadline: Duration,
}

impl MemoryBudget {
    /// Creates a budget.
    ///
    /// # Arguments
    ///
    /// * `limit` - Ceiling in bytes; usage is always strictly below it
    /// * `poll` - Longest single wait before re-checking the deadline
    /// * `deadline` - Total time a reservation may wait before failing
    pub fn new(limit: u64, poll: Duration, deadline: Duration) -> Self {
        Self {
            state: Mutex::new(BudgetState::default()),
            released: Condvar::new(),
            limit,
            poll,
            deadline,
        }
    }

    /// Blocks until `amount` bytes fit under the limit, then claims them.
    ///
    /// # Errors
    ///
    /// - [`StoreError::BudgetTooSmall`] if `amount` can never fit
    /// - [`StoreError::AdmissionTimeout`] if the deadline passes first
    pub fn reserve(&self, amount: u64) -> Result<Reservation<'_>> {
        if amount >= self.limit {
            return Err(StoreError::BudgetTooSmall {
                requested: amount,
                limit: self.limit,
            });
        }

        let started = Instant::now();
        let mut state = loop {
            if let Some(state) = self.state.try_lock_for(self.poll) {
                break state;
            }
            self.check_deadline(amount, started)?;
        };

        while state.usage + amount >= self.limit {
            self.check_deadline(amount, started)?;
            let remaining = self.deadline.saturating_sub(started.elapsed());
            let timed_out = self
                .released
                .wait_for(&mut state, self.poll.min(remaining))
                .timed_out();
            if timed_out {
                trace!(amount, usage = state.usage, "memory admission still waiting");
            }
        }

        state.usage += amount;
        state.peak = state.peak.max(state.usage);
        Ok(Reservation {
            budget: self,
            amount,
        })
    }

    fn check_deadline(&self, amount: u64, started: Instant) -> Result<()> {
        let waited = started.elapsed();
        if waited >= self.deadline {
            return Err(StoreError::AdmissionTimeout {
                requested: amount,
                waited,
            });
        }
        Ok(())
    }

    fn release(&self, amount: u64) {
        let mut state = self.state.lock();
        debug_assert!(state.usage >= amount, "released more than reserved");
        state.usage = state.usage.saturating_sub(amount);
        drop(state);
        self.released.notify_all();
    }

    /// Bytes currently reserved.
    pub fn usage(&self) -> u64 {
        self.state.lock().usage
    }

    /// Highest usage observed so far.
    pub fn peak(&self) -> u64 {
        self.state.lock().peak
    }

    /// Configured ceiling in bytes.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// A claim on a [`MemoryBudget`], released exactly once when dropped.
#[must_use = "dropping a reservation releases it immediately"]
#[derive(Debug)]
pub struct Reservation<'a> {
    budget: &'a MemoryBudget,
    amount: u64,
}

impl Reservation<'_> {
    /// Bytes held by this reservation.
    pub fn amount(&self) -> u64 {
        self.amount
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.budget.release(self.amount);
    }
}

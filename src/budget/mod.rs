//! Memory admission control.
//!
//! - [`MemoryBudget`] - Shared byte budget gating in-flight part data
//! - [`Reservation`] - Guard that returns its bytes to the budget on drop

mod admission;

pub use admission::{MemoryBudget, Reservation};

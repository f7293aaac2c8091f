//! Line-oriented operator shell.
//!
//! - [`Command`] - Parsed operator command
//! - [`Shell`] - Reads commands and runs each on its own thread

mod command;
mod dispatch;

pub use command::Command;
pub use dispatch::Shell;

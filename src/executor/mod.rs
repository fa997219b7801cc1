//! Subprocess execution module.
//!
//! Handles safe subprocess spawning, optional privilege elevation, and
//! optional execution timeouts.

mod subprocess;

pub use subprocess::{run_command, SubprocessBuilder, SubprocessResult};

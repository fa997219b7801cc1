//! Error types for ssl-setup.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;

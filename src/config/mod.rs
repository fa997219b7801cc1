//! Configuration module for ssl-setup.
//!
//! Handles loading and validating tool configuration from TOML files.

mod settings;

pub use settings::*;

//! ssl-setup library
//!
//! Building blocks for the `ssl-setup` tool, which obtains a TLS certificate
//! through certbot and installs the resulting certificate and key files where
//! the SSL-terminating service expects them.

pub mod config;
pub mod error;
pub mod executor;
pub mod provision;
pub mod validation;

//! Input validation.
//!
//! The domain is interpolated into a filesystem path and both the domain and
//! email become certbot arguments, so both are checked before use.

mod domain;
mod email;

pub use domain::validate_domain;
pub use email::validate_email;

//! Domain name validation.
//!
//! Validates the domain a certificate is requested for. The domain is used
//! to build the `live/{domain}` source paths, so anything that is not a
//! plain hostname is rejected.

use crate::error::{SetupError, ValidationErrorKind};

/// Maximum length for a domain name.
const MAX_DOMAIN_LENGTH: usize = 253;

/// Maximum length for a domain label (part between dots).
const MAX_LABEL_LENGTH: usize = 63;

fn invalid(message: String) -> SetupError {
    SetupError::Validation {
        kind: ValidationErrorKind::InvalidParameter {
            param: "domain".to_string(),
            message,
        },
    }
}

/// Validates a domain name.
///
/// # Rules
///
/// - Must be 1-253 characters
/// - Each label (part between dots) must be 1-63 characters
/// - Labels must start and end with alphanumeric characters
/// - Labels can contain hyphens but not at start or end
/// - No wildcards allowed (a wildcard would need a DNS-01 challenge anyway)
/// - Must have at least one dot (no bare TLDs)
///
/// Returns the validated domain, with any trailing dot stripped.
pub fn validate_domain(domain: &str) -> Result<&str, SetupError> {
    if domain.is_empty() {
        return Err(invalid("Domain name cannot be empty".to_string()));
    }

    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(invalid(format!(
            "Domain name exceeds maximum length of {} characters",
            MAX_DOMAIN_LENGTH
        )));
    }

    if domain.contains('*') {
        return Err(invalid("Wildcard domains are not allowed".to_string()));
    }

    // Normalize without a trailing dot
    let domain = domain.trim_end_matches('.');

    let labels: Vec<&str> = domain.split('.').collect();

    // Must have at least 2 labels (domain + TLD)
    if labels.len() < 2 {
        return Err(invalid(
            "Domain must have at least two parts (e.g., example.com)".to_string(),
        ));
    }

    for label in &labels {
        validate_domain_label(label)?;
    }

    Ok(domain)
}

/// Validates a single domain label (part between dots).
fn validate_domain_label(label: &str) -> Result<(), SetupError> {
    if label.is_empty() {
        return Err(invalid(
            "Domain contains empty label (consecutive dots)".to_string(),
        ));
    }

    if label.len() > MAX_LABEL_LENGTH {
        return Err(invalid(format!(
            "Domain label '{}' exceeds maximum length of {} characters",
            label, MAX_LABEL_LENGTH
        )));
    }

    let chars: Vec<char> = label.chars().collect();

    if !chars[0].is_ascii_alphanumeric() {
        return Err(invalid(format!(
            "Domain label '{}' must start with a letter or number",
            label
        )));
    }

    if !chars[chars.len() - 1].is_ascii_alphanumeric() {
        return Err(invalid(format!(
            "Domain label '{}' must end with a letter or number",
            label
        )));
    }

    for c in &chars {
        if !c.is_ascii_alphanumeric() && *c != '-' {
            return Err(invalid(format!(
                "Domain label '{}' contains invalid character '{}'",
                label, c
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domains() {
        assert!(validate_domain("example.com").is_ok());
        assert!(validate_domain("sub.example.com").is_ok());
        assert!(validate_domain("my-site.example.org").is_ok());
        assert!(validate_domain("a1.b2.c3.example.net").is_ok());
    }

    #[test]
    fn test_trailing_dot_normalized() {
        assert_eq!(validate_domain("example.com.").unwrap(), "example.com");
    }

    #[test]
    fn test_invalid_domains() {
        // Empty
        assert!(validate_domain("").is_err());
        // No TLD
        assert!(validate_domain("localhost").is_err());
        // Wildcard
        assert!(validate_domain("*.example.com").is_err());
        // Invalid characters
        assert!(validate_domain("example_site.com").is_err());
        assert!(validate_domain("example site.com").is_err());
        // Starting with hyphen
        assert!(validate_domain("-example.com").is_err());
        // Ending with hyphen
        assert!(validate_domain("example-.com").is_err());
        // Empty label
        assert!(validate_domain("example..com").is_err());
        // Path traversal via the domain would escape the live directory
        assert!(validate_domain("../etc/passwd").is_err());
    }
}

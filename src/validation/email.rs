//! Email address validation (basic).

use crate::error::{SetupError, ValidationErrorKind};

fn invalid(message: String) -> SetupError {
    SetupError::Validation {
        kind: ValidationErrorKind::InvalidParameter {
            param: "email".to_string(),
            message,
        },
    }
}

/// Validates an email address for the Let's Encrypt registration.
///
/// This is not a full RFC 5322 parse: it checks the basic shape and rejects
/// characters that could be used for command or argument injection.
pub fn validate_email(email: &str) -> Result<&str, SetupError> {
    if email.is_empty() {
        return Err(invalid("Email cannot be empty".to_string()));
    }

    if email.len() > 254 {
        return Err(invalid("Email exceeds maximum length".to_string()));
    }

    // Must contain @ and have parts on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(invalid("Invalid email format".to_string()));
    }

    // Domain part must contain a dot
    if !parts[1].contains('.') {
        return Err(invalid("Email domain must contain a dot".to_string()));
    }

    // Block shell metacharacters and control characters
    for c in email.chars() {
        let is_invalid = c.is_whitespace()
            || c.is_control()
            || matches!(
                c,
                '<' | '>'
                    | '"'
                    | '\''
                    | '`'
                    | '$'
                    | '&'
                    | '|'
                    | ';'
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '\\'
                    | '!'
                    | '#'
                    | '*'
                    | '?'
                    | '~'
            );
        if is_invalid {
            return Err(invalid(format!(
                "Email contains invalid character: '{}'",
                c
            )));
        }
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("user.name@subdomain.example.org").is_ok());
        assert!(validate_email("test+tag@example.com").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user name@example.com").is_err());
        assert!(validate_email("user;rm@example.com").is_err());
    }
}

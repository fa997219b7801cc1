//! Certbot-backed certificate requests.

use std::time::Duration;

use tracing::debug;

use crate::config::Settings;
use crate::error::SetupError;
use crate::executor::{SubprocessBuilder, SubprocessResult};

/// Interface to the external ACME client.
///
/// The real implementation shells out to certbot; tests substitute a stub.
pub trait AcmeClient {
    /// Request a certificate for the domain. The returned result carries the
    /// client's exit status and captured output; a non-zero exit is not an
    /// error at this layer.
    fn obtain(&self, domain: &str, email: &str) -> Result<SubprocessResult, SetupError>;
}

/// Requests certificates by invoking certbot with the standalone HTTP-01
/// challenge.
///
/// The standalone authenticator binds the validation port itself, so no
/// webroot is needed; the machine must be reachable on port 80 for the
/// domain being validated.
pub struct CertbotClient {
    binary: String,
    elevate: bool,
    staging: bool,
    timeout: Option<Duration>,
}

impl CertbotClient {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            binary: settings.certbot.binary.clone(),
            elevate: settings.certbot.elevate,
            staging: settings.letsencrypt.staging,
            timeout: settings.certbot_timeout(),
        }
    }

    fn build_args(&self, domain: &str, email: &str) -> Vec<String> {
        let mut args = vec![
            "certonly".to_string(),
            "--standalone".to_string(),
            "--preferred-challenges".to_string(),
            "http".to_string(),
            "--agree-tos".to_string(),
            "--non-interactive".to_string(),
            "--email".to_string(),
            email.to_string(),
            "-d".to_string(),
            domain.to_string(),
        ];

        if self.staging {
            args.push("--staging".to_string());
        }

        args
    }
}

impl AcmeClient for CertbotClient {
    fn obtain(&self, domain: &str, email: &str) -> Result<SubprocessResult, SetupError> {
        debug!(
            domain = domain,
            staging = self.staging,
            "Requesting certificate via certbot"
        );

        SubprocessBuilder::new(&self.binary)
            .args(self.build_args(domain, email))
            .elevate(self.elevate)
            .timeout(self.timeout)
            .run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_build_args() {
        let client = CertbotClient::from_settings(&Settings::default());
        let args = client.build_args("example.com", "admin@example.com");
        assert_eq!(
            args,
            vec![
                "certonly",
                "--standalone",
                "--preferred-challenges",
                "http",
                "--agree-tos",
                "--non-interactive",
                "--email",
                "admin@example.com",
                "-d",
                "example.com",
            ]
        );
    }

    #[test]
    fn test_build_args_staging() {
        let mut settings = Settings::default();
        settings.letsencrypt.staging = true;
        let client = CertbotClient::from_settings(&settings);
        let args = client.build_args("example.com", "admin@example.com");
        assert_eq!(args.last().map(String::as_str), Some("--staging"));
    }

    #[test]
    fn test_default_timeout_is_unbounded() {
        let client = CertbotClient::from_settings(&Settings::default());
        assert_eq!(client.timeout, None);
    }
}

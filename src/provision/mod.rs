//! Certificate provisioning flow.
//!
//! Three sequential phases: check for an existing issuance, request a new
//! certificate through the ACME client, and install the resulting files at
//! the configured target paths.

mod certbot;
mod install;
mod paths;

pub use certbot::{AcmeClient, CertbotClient};
pub use install::install_files;
pub use paths::CertificatePaths;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::SetupResult;
use crate::validation::{validate_domain, validate_email};

/// Result of a provisioning run.
#[derive(Debug)]
pub enum Outcome {
    /// A certificate and key for the domain already exist; nothing was done.
    AlreadyIssued { cert: PathBuf, key: PathBuf },
    /// A new certificate was obtained and installed at the target paths.
    Installed {
        cert: PathBuf,
        key: PathBuf,
        /// Captured stdout of the ACME client.
        client_output: String,
    },
    /// The ACME client exited non-zero; nothing was installed.
    RequestFailed { stderr: String },
}

/// Orchestrates the check / request / install sequence.
pub struct Provisioner {
    settings: Settings,
    client: Box<dyn AcmeClient>,
}

impl Provisioner {
    /// Create a provisioner backed by certbot, per the settings.
    pub fn new(settings: Settings) -> Self {
        let client = Box::new(CertbotClient::from_settings(&settings));
        Self { settings, client }
    }

    /// Create a provisioner with a custom ACME client.
    pub fn with_client(settings: Settings, client: Box<dyn AcmeClient>) -> Self {
        Self { settings, client }
    }

    /// Run the full provisioning flow for a domain/email pair.
    ///
    /// If both source files already exist under the live directory, the ACME
    /// client is not invoked at all. A non-zero client exit is reported as
    /// `Outcome::RequestFailed`, not as an error; install failures are
    /// propagated as errors.
    pub fn provision(&self, domain: &str, email: &str) -> SetupResult<Outcome> {
        let domain = validate_domain(domain)?;
        let email = validate_email(email)?;

        let source = CertificatePaths::for_domain(&self.settings.letsencrypt.live_dir, domain);

        // Existence alone is sufficient: no expiry or validity comparison.
        if source.both_exist() {
            info!(
                domain = domain,
                cert = %source.cert.display(),
                key = %source.key.display(),
                "Certificate and key already exist, skipping request"
            );
            return Ok(Outcome::AlreadyIssued {
                cert: source.cert,
                key: source.key,
            });
        }

        debug!(domain = domain, "No existing issuance found, requesting certificate");
        let result = self.client.obtain(domain, email)?;

        if !result.success {
            info!(
                domain = domain,
                exit_code = ?result.exit_code,
                "Certificate request failed"
            );
            return Ok(Outcome::RequestFailed {
                stderr: result.stderr,
            });
        }

        install_files(&source, &self.settings.install, self.settings.certbot.elevate)?;

        info!(
            domain = domain,
            cert = %self.settings.install.cert_path.display(),
            key = %self.settings.install.key_path.display(),
            "Certificate installed"
        );

        Ok(Outcome::Installed {
            cert: self.settings.install.cert_path.clone(),
            key: self.settings.install.key_path.clone(),
            client_output: result.stdout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::SetupError;
    use crate::executor::SubprocessResult;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Stub client that records invocations and writes the certbot output
    /// files on success.
    struct StubClient {
        live_dir: PathBuf,
        exit_code: i32,
        stdout: String,
        stderr: String,
        calls: Arc<AtomicUsize>,
    }

    impl StubClient {
        fn succeeding(live_dir: &Path) -> Self {
            Self {
                live_dir: live_dir.to_path_buf(),
                exit_code: 0,
                stdout: "Congratulations! Your certificate has been saved.".to_string(),
                stderr: String::new(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(live_dir: &Path, stderr: &str) -> Self {
            Self {
                live_dir: live_dir.to_path_buf(),
                exit_code: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn call_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    impl AcmeClient for StubClient {
        fn obtain(&self, domain: &str, _email: &str) -> Result<SubprocessResult, SetupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.exit_code == 0 {
                let dir = self.live_dir.join(domain);
                fs::create_dir_all(&dir).unwrap();
                fs::write(dir.join("fullchain.pem"), "CERT DATA").unwrap();
                fs::write(dir.join("privkey.pem"), "KEY DATA").unwrap();
            }
            Ok(SubprocessResult {
                success: self.exit_code == 0,
                exit_code: Some(self.exit_code),
                stdout: self.stdout.clone(),
                stderr: self.stderr.clone(),
            })
        }
    }

    fn test_settings(tmp: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.letsencrypt.live_dir = tmp.path().join("live");
        settings.certbot.elevate = false;
        settings.install.cert_path = tmp.path().join("ssl/certs/server.pem");
        settings.install.key_path = tmp.path().join("ssl/private/server.key");
        fs::create_dir_all(tmp.path().join("ssl/certs")).unwrap();
        fs::create_dir_all(tmp.path().join("ssl/private")).unwrap();
        settings
    }

    #[test]
    fn test_reuse_skips_client() {
        let tmp = TempDir::new().unwrap();
        let settings = test_settings(&tmp);

        let dir = settings.letsencrypt.live_dir.join("example.com");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("fullchain.pem"), "EXISTING CERT").unwrap();
        fs::write(dir.join("privkey.pem"), "EXISTING KEY").unwrap();

        let client = StubClient::succeeding(&settings.letsencrypt.live_dir);
        let calls = client.call_counter();
        let provisioner = Provisioner::with_client(settings, Box::new(client));

        let outcome = provisioner
            .provision("example.com", "admin@example.com")
            .unwrap();
        match outcome {
            Outcome::AlreadyIssued { cert, key } => {
                assert!(cert.ends_with("example.com/fullchain.pem"));
                assert!(key.ends_with("example.com/privkey.pem"));
            }
            other => panic!("Expected AlreadyIssued, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_successful_request_installs_files() {
        let tmp = TempDir::new().unwrap();
        let settings = test_settings(&tmp);
        let cert_target = settings.install.cert_path.clone();
        let key_target = settings.install.key_path.clone();

        let client = StubClient::succeeding(&settings.letsencrypt.live_dir);
        let provisioner = Provisioner::with_client(settings, Box::new(client));

        let outcome = provisioner
            .provision("example.com", "admin@example.com")
            .unwrap();
        match outcome {
            Outcome::Installed { client_output, .. } => {
                assert!(client_output.contains("Congratulations"));
            }
            other => panic!("Expected Installed, got {:?}", other),
        }

        assert_eq!(fs::read_to_string(&cert_target).unwrap(), "CERT DATA");
        assert_eq!(fs::read_to_string(&key_target).unwrap(), "KEY DATA");
    }

    #[test]
    fn test_failed_request_installs_nothing() {
        let tmp = TempDir::new().unwrap();
        let settings = test_settings(&tmp);
        let cert_target = settings.install.cert_path.clone();
        let key_target = settings.install.key_path.clone();

        let client = StubClient::failing(
            &settings.letsencrypt.live_dir,
            "An unexpected error occurred",
        );
        let provisioner = Provisioner::with_client(settings, Box::new(client));

        let outcome = provisioner
            .provision("example.com", "admin@example.com")
            .unwrap();
        match outcome {
            Outcome::RequestFailed { stderr } => {
                assert!(stderr.contains("unexpected error"));
            }
            other => panic!("Expected RequestFailed, got {:?}", other),
        }

        assert!(!cert_target.exists());
        assert!(!key_target.exists());
    }

    #[test]
    fn test_invalid_domain_rejected_before_request() {
        let tmp = TempDir::new().unwrap();
        let settings = test_settings(&tmp);

        let provisioner = Provisioner::with_client(
            settings.clone(),
            Box::new(StubClient::succeeding(&settings.letsencrypt.live_dir)),
        );

        assert!(provisioner
            .provision("../etc/passwd", "admin@example.com")
            .is_err());
        assert!(provisioner
            .provision("example.com", "not-an-email")
            .is_err());
    }
}

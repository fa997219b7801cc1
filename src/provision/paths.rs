//! Certbot output path derivation.

use std::path::{Path, PathBuf};

/// The pair of files certbot writes for a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    /// Full certificate chain (`fullchain.pem`).
    pub cert: PathBuf,
    /// Private key (`privkey.pem`).
    pub key: PathBuf,
}

impl CertificatePaths {
    /// Compute the expected output paths for a domain under the live
    /// directory, e.g. `/etc/letsencrypt/live/example.com/fullchain.pem`.
    pub fn for_domain(live_dir: &Path, domain: &str) -> Self {
        let dir = live_dir.join(domain);
        Self {
            cert: dir.join("fullchain.pem"),
            key: dir.join("privkey.pem"),
        }
    }

    /// Whether both the certificate and the key are present on disk.
    pub fn both_exist(&self) -> bool {
        self.cert.exists() && self.key.exists()
    }
}

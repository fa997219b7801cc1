//! Installation of the issued certificate and key at the target paths.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::InstallConfig;
use crate::error::{InstallErrorKind, SetupError};
use crate::executor::SubprocessBuilder;

use super::paths::CertificatePaths;

/// Timeout for the copy subprocesses. Copying two small PEM files should
/// never take this long; a hang here means sudo is prompting or the target
/// filesystem is wedged.
const COPY_TIMEOUT: Duration = Duration::from_secs(30);

/// Copy the issued certificate and key to the configured target paths.
///
/// A stale file at either destination is removed first, so the service
/// consuming these paths never sees a mix of old and new material. Remove
/// and copy failures are propagated.
pub fn install_files(
    source: &CertificatePaths,
    install: &InstallConfig,
    elevate: bool,
) -> Result<(), SetupError> {
    remove_stale(&install.cert_path)?;
    remove_stale(&install.key_path)?;

    copy_file(&source.cert, &install.cert_path, elevate)?;
    copy_file(&source.key, &install.key_path, elevate)?;

    Ok(())
}

/// Remove a pre-existing file at the destination, if any.
fn remove_stale(target: &Path) -> Result<(), SetupError> {
    match fs::remove_file(target) {
        Ok(()) => {
            info!(path = %target.display(), "Removed existing file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SetupError::Install {
            kind: InstallErrorKind::RemoveFailed {
                path: target.to_path_buf(),
                message: e.to_string(),
            },
        }),
    }
}

/// Copy a source file to its target via `cp`, optionally through sudo.
///
/// The live directory and the targets are root-owned in a real deployment,
/// so the copy goes through the same elevation mechanism as the certbot
/// call rather than `std::fs::copy`.
fn copy_file(source: &Path, target: &Path, elevate: bool) -> Result<(), SetupError> {
    debug!(
        source = %source.display(),
        target = %target.display(),
        "Copying file"
    );

    let result = SubprocessBuilder::new("cp")
        .arg(&source.to_string_lossy())
        .arg(&target.to_string_lossy())
        .elevate(elevate)
        .timeout(Some(COPY_TIMEOUT))
        .run()?;

    if !result.success {
        return Err(SetupError::Install {
            kind: InstallErrorKind::CopyFailed {
                source_path: source.to_path_buf(),
                target: target.to_path_buf(),
                message: result.stderr.trim().to_string(),
            },
        });
    }

    Ok(())
}

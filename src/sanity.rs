//! Pre-flight sanity checks for the runtime environment
//!
//! The bootstrap refuses to do anything unless it runs with an effective UID
//! of 0. A missing gluster binary is only logged here; it surfaces
//! as a spawn failure of the first gluster step.

use nix::unistd::Uid;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{BootstrapError, Result};

/// Fail with [`BootstrapError::NotRoot`] unless `euid` is the superuser.
pub fn check_privileges(euid: Uid) -> Result<()> {
    if euid.is_root() {
        tracing::debug!("Privilege check passed (euid={})", euid);
        Ok(())
    } else {
        tracing::debug!("Privilege check failed (euid={})", euid);
        Err(BootstrapError::NotRoot)
    }
}

/// Check if the gluster binary is available
///
/// Paths containing a separator are checked directly, bare names are
/// resolved through `PATH` with `which`.
pub fn gluster_available(bin: &Path) -> bool {
    if bin.components().count() > 1 {
        return bin.is_file();
    }
    Command::new("which")
        .arg(bin)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Log early if the gluster CLI cannot be found
pub fn warn_if_gluster_missing(bin: &Path) {
    if !gluster_available(bin) {
        tracing::info!(
            "gluster binary {} not found; install glusterfs-server",
            bin.display()
        );
    }
}

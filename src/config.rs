//! Bootstrap configuration: fixed volume literals plus the resolved environment.
//!
//! The volume name, brick path and force flag never come from input. Only the
//! home directory and the host name are read from the environment.

use nix::unistd::{Uid, User};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};
use crate::gluster_args::Brick;

/// Name of the volume the bootstrap creates and starts.
pub const VOLUME_NAME: &str = "test";

/// Local path contributed as the volume's only brick.
pub const BRICK_PATH: &str = "/mnt/gluster-brick";

/// Forced creation is always requested.
pub const FORCE_CREATE: bool = true;

/// Configuration directory, relative to the invoking user's home.
pub const CONFIG_DIR: &str = ".config/gluster";

/// Environment variable holding the invoking user's home directory.
pub const HOME_ENV: &str = "HOME";

/// Environment variable holding the local host name.
pub const HOSTNAME_ENV: &str = "HOSTNAME";

/// Everything the bootstrap pipeline needs to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub volume_name: String,
    pub brick_path: PathBuf,
    pub force: bool,
    pub home: PathBuf,
    pub hostname: String,
}

impl BootstrapConfig {
    /// Build a config from the fixed literals and explicit home/host values
    pub fn new(home: impl Into<PathBuf>, hostname: impl Into<String>) -> Self {
        Self {
            volume_name: VOLUME_NAME.to_string(),
            brick_path: PathBuf::from(BRICK_PATH),
            force: FORCE_CREATE,
            home: home.into(),
            hostname: hostname.into(),
        }
    }

    /// Resolve home and host name from the process environment
    pub fn from_env() -> Result<Self> {
        let home = resolve_home(std::env::var_os(HOME_ENV))?;
        let hostname = resolve_hostname(std::env::var_os(HOSTNAME_ENV))?;
        tracing::debug!("Resolved home={} hostname={}", home.display(), hostname);
        Ok(Self::new(home, hostname))
    }

    /// Configuration directory under the home directory
    pub fn config_dir(&self) -> PathBuf {
        self.home.join(CONFIG_DIR)
    }

    /// Brick bound to the local host
    pub fn brick(&self) -> Brick {
        Brick::new(self.hostname.clone(), self.brick_path.clone())
    }
}

/// Resolve the home directory.
///
/// Uses the `HOME` value when set and non-empty, otherwise the password
/// database entry of the effective user.
pub fn resolve_home(env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(home) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    tracing::debug!("{} not set, falling back to the user database", HOME_ENV);
    home_from_passwd(nix::unistd::geteuid())
}

fn home_from_passwd(uid: Uid) -> Result<PathBuf> {
    match User::from_uid(uid) {
        Ok(Some(user)) => Ok(user.dir),
        Ok(None) => Err(BootstrapError::environment(format!(
            "{} is not set and uid {} has no passwd entry",
            HOME_ENV, uid
        ))),
        Err(e) => Err(BootstrapError::environment(format!(
            "{} is not set and the user database lookup failed: {}",
            HOME_ENV, e
        ))),
    }
}

/// Resolve the local host name.
///
/// `HOSTNAME` is a shell variable that is often not exported, so an unset or
/// empty value falls back to `gethostname(2)`.
pub fn resolve_hostname(env_value: Option<OsString>) -> Result<String> {
    if let Some(name) = env_value.filter(|v| !v.is_empty()) {
        return name.into_string().map_err(|raw| {
            BootstrapError::environment(format!("{} is not valid UTF-8: {:?}", HOSTNAME_ENV, raw))
        });
    }
    tracing::debug!("{} not set, falling back to gethostname", HOSTNAME_ENV);
    let name = nix::unistd::gethostname()
        .map_err(|e| BootstrapError::environment(format!("gethostname failed: {}", e)))?;
    name.into_string()
        .map_err(|raw| BootstrapError::environment(format!("host name is not valid UTF-8: {:?}", raw)))
}

/// Whether [`ensure_config_dir`] had to create anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DirState {
    #[strum(serialize = "created")]
    Created,
    #[strum(serialize = "already present")]
    AlreadyPresent,
}

/// Create `path` and any missing parents; no-op if it already exists.
pub fn ensure_config_dir(path: &Path) -> Result<DirState> {
    if path.is_dir() {
        tracing::debug!("Config directory {} already present", path.display());
        return Ok(DirState::AlreadyPresent);
    }
    fs::create_dir_all(path)?;
    tracing::info!("Created config directory {}", path.display());
    Ok(DirState::Created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_uses_fixed_literals() {
        let config = BootstrapConfig::new("/root", "node1");
        assert_eq!(config.volume_name, "test");
        assert_eq!(config.brick_path, PathBuf::from("/mnt/gluster-brick"));
        assert!(config.force);
    }

    #[test]
    fn test_config_dir_is_under_home() {
        let config = BootstrapConfig::new("/home/alice", "node1");
        assert_eq!(
            config.config_dir(),
            PathBuf::from("/home/alice/.config/gluster")
        );
    }

    #[test]
    fn test_brick_binds_hostname() {
        let config = BootstrapConfig::new("/root", "storage-01");
        assert_eq!(config.brick().to_string(), "storage-01:/mnt/gluster-brick");
    }

    #[test]
    fn test_resolve_home_prefers_env() {
        let home = resolve_home(Some(OsString::from("/srv/home"))).unwrap();
        assert_eq!(home, PathBuf::from("/srv/home"));
    }

    #[test]
    fn test_resolve_home_empty_falls_back_to_passwd() {
        let expected = User::from_uid(nix::unistd::geteuid()).unwrap();
        let resolved = resolve_home(Some(OsString::new()));

        match expected {
            Some(user) => assert_eq!(resolved.unwrap(), user.dir),
            None => assert!(matches!(resolved, Err(BootstrapError::Environment(_)))),
        }
    }

    #[test]
    fn test_resolve_home_unset_falls_back_to_passwd() {
        let expected = User::from_uid(nix::unistd::geteuid()).unwrap().map(|u| u.dir);
        assert_eq!(resolve_home(None).ok(), expected);
    }

    #[test]
    fn test_resolve_hostname_prefers_env() {
        let name = resolve_hostname(Some(OsString::from("gluster-a"))).unwrap();
        assert_eq!(name, "gluster-a");
    }

    #[test]
    fn test_resolve_hostname_falls_back_to_gethostname() {
        let name = resolve_hostname(None).unwrap();
        let expected = nix::unistd::gethostname().unwrap().into_string().unwrap();
        assert_eq!(name, expected);
    }

    #[test]
    fn test_ensure_config_dir_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b/.config/gluster");

        assert_eq!(ensure_config_dir(&dir).unwrap(), DirState::Created);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_config_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".config/gluster");

        ensure_config_dir(&dir).unwrap();
        assert_eq!(ensure_config_dir(&dir).unwrap(), DirState::AlreadyPresent);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_config_dir_rejects_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gluster");
        fs::write(&path, b"not a directory").unwrap();

        let err = ensure_config_dir(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::Io(_)));
    }

    #[test]
    fn test_dir_state_display() {
        assert_eq!(DirState::Created.to_string(), "created");
        assert_eq!(DirState::AlreadyPresent.to_string(), "already present");
    }
}

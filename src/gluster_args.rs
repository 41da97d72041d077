//! Type-safe gluster CLI argument contracts.
//!
//! Each gluster subcommand the bootstrap issues is a struct implementing
//! [`GlusterArgs`], so the exact argument vector lives in one place and the
//! compiler catches a missing or misspelled field.

use std::fmt;
use std::path::PathBuf;

/// Trait for typed gluster subcommand arguments.
///
/// # Contract
///
/// - `to_cli_args()`: arguments exactly as `gluster` expects them, without
///   the binary name.
/// - `step_name()`: short name of the step for logs and errors.
pub trait GlusterArgs {
    /// Convert struct fields to CLI arguments.
    ///
    /// Example: `["volume", "start", "test"]`
    fn to_cli_args(&self) -> Vec<String>;

    /// Step name, e.g. `"volume create"`.
    fn step_name(&self) -> &'static str;
}

/// A brick specification: a path on a given host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brick {
    pub host: String,
    pub path: PathBuf,
}

impl Brick {
    pub fn new(host: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Brick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.path.display())
    }
}

// ============================================================================
// Volume Create
// ============================================================================

/// Arguments for `gluster volume create`.
#[derive(Debug, Clone)]
pub struct VolumeCreateArgs {
    /// Volume name.
    pub volume: String,
    /// Bricks backing the volume.
    pub bricks: Vec<Brick>,
    /// Override the refusal to reuse a non-empty or root-filesystem path.
    pub force: bool,
}

impl GlusterArgs for VolumeCreateArgs {
    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "volume".to_string(),
            "create".to_string(),
            self.volume.clone(),
        ];
        args.extend(self.bricks.iter().map(Brick::to_string));
        if self.force {
            args.push("force".to_string());
        }
        args
    }

    fn step_name(&self) -> &'static str {
        "volume create"
    }
}

// ============================================================================
// Volume Start
// ============================================================================

/// Arguments for `gluster volume start`.
#[derive(Debug, Clone)]
pub struct VolumeStartArgs {
    /// Volume name.
    pub volume: String,
    /// Restart bricks of an already started volume.
    pub force: bool,
}

impl GlusterArgs for VolumeStartArgs {
    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "volume".to_string(),
            "start".to_string(),
            self.volume.clone(),
        ];
        if self.force {
            args.push("force".to_string());
        }
        args
    }

    fn step_name(&self) -> &'static str {
        "volume start"
    }
}

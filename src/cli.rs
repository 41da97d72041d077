use clap::Parser;
use std::path::PathBuf;

use crate::bootstrap::DEFAULT_GLUSTER_BIN;

/// gluster-bootstrap - create and start a local single-brick Gluster volume
///
/// Must be run as root. With no arguments it ensures ~/.config/gluster
/// exists, then runs `gluster volume create test $HOSTNAME:/mnt/gluster-brick
/// force` and `gluster volume start test`.
#[derive(Parser, Debug)]
#[command(name = "gluster-bootstrap")]
#[command(about = "Create and start a local single-brick Gluster volume")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: log the gluster commands without running them.
    ///
    /// The config directory is not created either. The root check still
    /// applies.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path or name of the gluster binary
    #[arg(long, default_value = DEFAULT_GLUSTER_BIN, hide = true)]
    pub gluster_bin: PathBuf,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

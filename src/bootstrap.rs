//! Bootstrap pipeline
//!
//! Privilege check, config directory, `gluster volume create ... force`,
//! `gluster volume start`. Each step runs only if every earlier step
//! succeeded; nothing is retried or rolled back.

use nix::unistd::Uid;
use std::path::PathBuf;

use crate::command_runner::{run_gluster_safe, CommandOutput};
use crate::config::{ensure_config_dir, BootstrapConfig, DirState};
use crate::error::Result;
use crate::gluster_args::{GlusterArgs, VolumeCreateArgs, VolumeStartArgs};
use crate::sanity::check_privileges;

/// Default gluster binary, resolved through `PATH`
pub const DEFAULT_GLUSTER_BIN: &str = "gluster";

/// Bootstrap runner
#[derive(Debug, Clone)]
pub struct Bootstrap {
    config: BootstrapConfig,
    gluster_bin: PathBuf,
    dry_run: bool,
}

/// What a successful run did
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub config_dir: PathBuf,
    /// `None` in dry-run mode
    pub config_dir_state: Option<DirState>,
    pub create: CommandOutput,
    pub start: CommandOutput,
}

impl Bootstrap {
    pub fn new(config: BootstrapConfig, gluster_bin: impl Into<PathBuf>) -> Self {
        Self {
            config,
            gluster_bin: gluster_bin.into(),
            dry_run: false,
        }
    }

    /// Log the gluster commands without running them or touching the filesystem
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// `gluster volume create <name> <host>:<brick> force`
    pub fn create_args(&self) -> VolumeCreateArgs {
        VolumeCreateArgs {
            volume: self.config.volume_name.clone(),
            bricks: vec![self.config.brick()],
            force: self.config.force,
        }
    }

    /// `gluster volume start <name>`
    pub fn start_args(&self) -> VolumeStartArgs {
        VolumeStartArgs {
            volume: self.config.volume_name.clone(),
            force: false,
        }
    }

    /// Run the whole pipeline as the user identified by `euid`.
    pub fn run(&self, euid: Uid) -> Result<BootstrapReport> {
        check_privileges(euid)?;

        let config_dir = self.config.config_dir();
        let config_dir_state = if self.dry_run {
            tracing::info!("[DRY RUN] Skipped: ensure {}", config_dir.display());
            None
        } else {
            Some(ensure_config_dir(&config_dir)?)
        };

        let create = self.run_step(&self.create_args())?;
        let start = self.run_step(&self.start_args())?;

        tracing::info!(
            "Volume {} created and started on {}",
            self.config.volume_name,
            self.config.brick()
        );

        Ok(BootstrapReport {
            config_dir,
            config_dir_state,
            create,
            start,
        })
    }

    fn run_step<T: GlusterArgs>(&self, args: &T) -> Result<CommandOutput> {
        let output = run_gluster_safe(&self.gluster_bin, args, self.dry_run)?;
        output.ensure_success(args.step_name())?;
        Ok(output)
    }
}

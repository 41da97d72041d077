//! Type-Safe gluster Execution
//!
//! `run_gluster_safe` is the only place the bootstrap spawns the gluster CLI.
//! It guarantees:
//!
//! - PID registration and a parent-death signal for cleanup; the child stays
//!   in our process group so it keeps the terminal as a foreground job
//! - Arguments come from a [`GlusterArgs`] contract, never raw strings
//! - The tool writes straight to the inherited stdout/stderr

use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{BootstrapError, Result};
use crate::gluster_args::GlusterArgs;
use crate::process_guard::{ChildRegistry, CommandDeathSignal};

/// Execute one gluster subcommand and block until it exits.
///
/// # Returns
///
/// - `Ok(output)` - the command ran (or was skipped in dry-run); check
///   `output.success`
/// - `Err(BootstrapError::Spawn)` - the binary could not be executed
pub fn run_gluster_safe<T: GlusterArgs>(
    gluster_bin: &Path,
    args: &T,
    dry_run: bool,
) -> Result<CommandOutput> {
    let step = args.step_name();
    let cli_args = args.to_cli_args();

    tracing::info!(
        "run_gluster_safe: {} {}",
        gluster_bin.display(),
        cli_args.join(" ")
    );

    if dry_run {
        tracing::info!("[DRY RUN] Skipped: {}", step);
        return Ok(CommandOutput::dry_run());
    }

    let mut child = Command::new(gluster_bin)
        .args(&cli_args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .die_with_parent()
        .spawn()
        .map_err(|e| BootstrapError::spawn(gluster_bin.display().to_string(), e))?;
    let pid = child.id();

    if let Ok(mut registry) = ChildRegistry::global().lock() {
        registry.register(pid);
    }

    let waited = child.wait();

    if let Ok(mut registry) = ChildRegistry::global().lock() {
        registry.unregister(pid);
    }

    let status = waited?;
    let output = CommandOutput::from_status(status);

    if output.success {
        tracing::info!("gluster {} succeeded", step);
    } else {
        tracing::info!("gluster {} failed with exit code {:?}", step, output.exit_code);
    }
    Ok(output)
}

/// Result of a single gluster invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `128 + signal` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Whether the command exited with status 0.
    pub success: bool,
    /// Whether the command was skipped because of dry-run mode.
    pub dry_run: bool,
}

impl CommandOutput {
    fn dry_run() -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            dry_run: true,
        }
    }

    /// Map an exit status the way a shell reports it
    pub fn from_status(status: ExitStatus) -> Self {
        let exit_code = status
            .code()
            .or_else(|| status.signal().map(|sig| 128 + sig));
        Self {
            exit_code,
            success: status.success(),
            dry_run: false,
        }
    }

    /// Turn an unsuccessful output into [`BootstrapError::CommandFailed`]
    pub fn ensure_success(&self, step: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(BootstrapError::command_failed(step, self.exit_code))
        }
    }
}

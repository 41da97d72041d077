//! gluster-bootstrap - main entry point
//!
//! Root check, config directory, then `gluster volume create` and
//! `gluster volume start`, stopping at the first failure.

use gluster_bootstrap::bootstrap::Bootstrap;
use gluster_bootstrap::cli::Cli;
use gluster_bootstrap::config::BootstrapConfig;
use gluster_bootstrap::error::Result;
use gluster_bootstrap::{process_guard, sanity};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Initialize the logger; RUST_LOG overrides the verbosity flag
fn init_logger(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.log_level());
    debug!("CLI arguments parsed: {:?}", cli);

    if let Err(e) = run(&cli) {
        debug!("Bootstrap failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let euid = nix::unistd::geteuid();
    sanity::check_privileges(euid)?;

    if let Err(e) = process_guard::init_signal_handlers() {
        tracing::warn!("Failed to initialize signal handlers: {}", e);
    }

    if !cli.dry_run {
        sanity::warn_if_gluster_missing(&cli.gluster_bin);
    }

    let config = BootstrapConfig::from_env()?;
    let report = Bootstrap::new(config, &cli.gluster_bin)
        .with_dry_run(cli.dry_run)
        .run(euid)?;

    if let Some(state) = report.config_dir_state {
        info!("Config directory {} {}", report.config_dir.display(), state);
    }
    Ok(())
}

//! gluster-bootstrap library
//!
//! Creates and starts a local single-brick Gluster volume by driving the
//! `gluster` administration CLI.

pub mod bootstrap;
pub mod cli;
pub mod command_runner;
pub mod config;
pub mod error;
pub mod gluster_args;
pub mod process_guard;
pub mod sanity;

// Re-export main types for convenience
pub use bootstrap::{Bootstrap, BootstrapReport};
pub use command_runner::{run_gluster_safe, CommandOutput};
pub use config::{BootstrapConfig, DirState};
pub use error::BootstrapError;
pub use gluster_args::{Brick, GlusterArgs, VolumeCreateArgs, VolumeStartArgs};
pub use process_guard::{ChildRegistry, CommandDeathSignal};

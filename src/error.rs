//! Error handling module for gluster-bootstrap
//!
//! Every failure the bootstrap can hit maps to one variant here, and every
//! variant maps to the exit status the binary reports.

use thiserror::Error;

/// Fixed diagnostic printed when the bootstrap is not run as the superuser.
pub const NOT_ROOT_MESSAGE: &str = "This script must be run as root";

/// Exit status used when the gluster binary cannot be executed at all.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Main error type for the bootstrap
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Effective UID is not 0
    #[error("{}", NOT_ROOT_MESSAGE)]
    NotRoot,

    /// HOME or the host name could not be resolved
    #[error("Environment error: {0}")]
    Environment(String),

    /// IO errors (config directory creation)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The gluster binary could not be executed
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A gluster step exited unsuccessfully
    #[error("{step} failed ({})", describe_exit(*.exit_code))]
    CommandFailed {
        step: String,
        /// Exit status of the tool, `None` if it was killed by a signal
        /// that could not be determined.
        exit_code: Option<i32>,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;

impl BootstrapError {
    /// Create an environment error
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Create a spawn error for `program`
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a command failure for `step`
    pub fn command_failed(step: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::CommandFailed {
            step: step.into(),
            exit_code,
        }
    }

    /// Process exit status the binary should report for this error.
    ///
    /// Gluster failures propagate the tool's own status so callers see the
    /// same code they would get from running the command by hand.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotRoot | Self::Environment(_) | Self::Io(_) => 1,
            Self::Spawn { .. } => EXIT_SPAWN_FAILED,
            Self::CommandFailed { exit_code, .. } => match exit_code {
                Some(0) | None => 1,
                Some(code) => *code,
            },
        }
    }
}

//! Error types and Result aliases for minish

use std::fmt;
use std::path::PathBuf;

use nix::errno::Errno;

use crate::parser::ParseError;

/// Result type alias for minish operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for minish
#[derive(Debug)]
pub enum Error {
    // === Launch errors ===
    /// Failed to create the child process
    SpawnFailed {
        program: String,
        errno: Errno,
    },

    /// Waiting on a foreground child failed
    WaitFailed {
        pid: i32,
        errno: Errno,
    },

    // === Built-in errors ===
    /// `cd` called with the wrong number of arguments
    CdUsage,

    /// `cd` target does not exist or is not a directory
    CdNoSuchDirectory {
        path: String,
    },

    /// Any other working-directory change failure
    CdFailed {
        path: String,
        errno: Errno,
    },

    // === Configuration errors ===
    /// Failed to read a configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to parse a configuration file
    ConfigParseFailed {
        path: PathBuf,
        reason: String,
    },

    // === Startup errors ===
    /// Process-group or controlling-terminal assignment failed
    TerminalSetupFailed {
        reason: String,
    },

    /// Installing the process-wide signal mask failed
    SignalSetupFailed {
        reason: String,
    },

    /// Spawning one of the actor threads failed
    ThreadSpawnFailed {
        name: String,
        reason: String,
    },

    /// An actor thread panicked
    ThreadPanicked {
        name: String,
    },

    // === Wrapped errors ===
    /// Command-line tokenization errors
    Parse(ParseError),

    /// I/O errors
    Io(std::io::Error),

    /// Raw OS errors
    Errno(Errno),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl Error {
    /// True for launch failures caused by resource exhaustion, which the
    /// exec actor treats as fatal to the whole shell rather than to the
    /// single command.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            Error::SpawnFailed {
                errno: Errno::EAGAIN | Errno::ENOMEM,
                ..
            }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Launch errors
            Error::SpawnFailed { program, errno } => {
                write!(f, "failed to spawn '{}': {}", program, errno.desc())
            }
            Error::WaitFailed { pid, errno } => {
                write!(f, "failed to wait for pid {}: {}", pid, errno.desc())
            }

            // Built-in errors: wording is interface contract
            Error::CdUsage => {
                write!(f, "cd: one argument required")
            }
            Error::CdNoSuchDirectory { path } => {
                write!(f, "cd: {}: No such directory", path)
            }
            Error::CdFailed { path, errno } => {
                write!(f, "cd: {}: {}", path, errno.desc())
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(
                    f,
                    "failed to load config from '{}': {}",
                    path.display(),
                    reason
                )
            }
            Error::ConfigParseFailed { path, reason } => {
                write!(f, "failed to parse config '{}': {}", path.display(), reason)
            }

            // Startup errors
            Error::TerminalSetupFailed { reason } => {
                write!(f, "terminal setup failed: {}", reason)
            }
            Error::SignalSetupFailed { reason } => {
                write!(f, "signal setup failed: {}", reason)
            }
            Error::ThreadSpawnFailed { name, reason } => {
                write!(f, "failed to spawn '{}' thread: {}", name, reason)
            }
            Error::ThreadPanicked { name } => {
                write!(f, "'{}' thread panicked", name)
            }

            // Wrapped errors
            Error::Parse(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Errno(errno) => write!(f, "{}", errno.desc()),

            // Generic fallback
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<Errno> for Error {
    fn from(err: Errno) -> Self {
        Error::Errno(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}

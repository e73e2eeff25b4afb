use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a [`Powermate`](crate::Powermate) session.
#[derive(Debug, Error)]
pub enum Error {
    /// No device node exists at the given path.
    #[error("no device at {}", .0.display())]
    NotFound(PathBuf),
    /// The device node exists but is not accessible to this process.
    #[error("permission denied opening {}", .0.display())]
    PermissionDenied(PathBuf),
    /// A bounded wait elapsed without a qualifying event.
    ///
    /// Recoverable; distinct from a zero-timeout poll finding nothing, which
    /// is `Ok(None)`.
    #[error("timed out waiting for an event")]
    TimedOut,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Nix(#[from] nix::Error),
}

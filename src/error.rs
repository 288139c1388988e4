// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Presentation Error: {0}")]
    Presentation(#[from] PresentationError),
}

/// Reasons a message could not be put on screen.
///
/// These never cross the queue boundary: the manager absorbs them and drops
/// the affected message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PresentationError {
    /// The container resolver found no view or window to present in.
    #[error("no root container available for presentation")]
    NoRootContainer,

    /// The view or view controller named by the presentation context was
    /// dropped before the message could be shown.
    #[error("presentation target is no longer alive")]
    TargetDropped,

    /// A shared manager was already installed for this process.
    #[error("a shared manager is already installed")]
    SharedAlreadyInstalled,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

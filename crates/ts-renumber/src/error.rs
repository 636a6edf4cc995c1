use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Stale = 1,
    InvalidArguments = 2,
    Io = 3,
}

#[derive(Debug, Error)]
pub enum RenumberError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] io::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl RenumberError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Read { .. } | Self::Stdin(_) => ExitCode::Io,
            Self::InvalidOptions(_) => ExitCode::InvalidArguments,
        }
    }
}

pub type RenumberResult<T> = Result<T, RenumberError>;

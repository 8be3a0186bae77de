use thiserror::Error;
use valuemaster_core::{SourceError, SourceErrorKind};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] valuemaster_core::ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Source(error) => match error.kind() {
                SourceErrorKind::InvalidInput => 2,
                SourceErrorKind::NotFound => 3,
                SourceErrorKind::Unavailable | SourceErrorKind::Malformed => 4,
            },
            Self::Serialization(_) => 10,
            Self::Io(_) => 10,
        }
    }
}

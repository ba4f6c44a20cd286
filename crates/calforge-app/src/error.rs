use thiserror::Error;

/// Application-level errors (file and HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RfcError(#[from] calforge_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] calforge_core::error::CoreError),

    #[error("I/O error on `{path}`: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether the error stems from a file that does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IoError { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

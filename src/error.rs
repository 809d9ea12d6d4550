use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuireError {
    #[error(transparent)]
    Note(#[from] crate::domain::NoteError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type QuireResult<T> = Result<T, QuireError>;

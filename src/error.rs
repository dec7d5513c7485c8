use thiserror::Error;

#[derive(Error, Debug)]
pub enum FintrackError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown source app: {0}")]
    UnknownSource(String),

    #[error("Remote client error: {0}")]
    Remote(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FintrackError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Terminal or file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Save data could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DreError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("{0}")]
    SubmissionError(String),
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;

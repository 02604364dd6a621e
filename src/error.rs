use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unsupported granularity '{0}': expected daily, monthly or yearly")]
    UnsupportedGranularity(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("No record with id '{0}' in the record book")]
    UnknownRecord(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComboError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Integrity Error: card '{card}': {reason}")]
    DataIntegrity { card: String, reason: String },

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Search cancelled after {evaluated} combinations")]
    Cancelled { evaluated: u64 },
}

pub type ComboResult<T> = Result<T, ComboError>;

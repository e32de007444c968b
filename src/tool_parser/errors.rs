use thiserror::Error;

/// Result type for tool parser operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Errors that can occur during tool parsing
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Unknown tool parser: {0}")]
    UnknownFormat(String),

    #[error("Tool parser already registered: {0}")]
    DuplicateParser(String),

    #[error("Failed to decode token ids: {0}")]
    Decode(String),

    #[error("Arguments are not valid JSON: {0}")]
    InvalidArguments(String),

    #[error("Parsing failed: {0}")]
    ParsingFailed(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

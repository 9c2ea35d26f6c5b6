// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, bad input, etc.) or downstream layers (DB, spreadsheet).
///
/// Lookups that simply find nothing are not errors; see `LookupOutcome`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database Error: {0}")]
    DbError(String),

    /// Missing or unreadable data source. Fatal for the whole process.
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("JSON Error: {0}")]
    JsonError(String),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::JsonError(e.to_string())
    }
}

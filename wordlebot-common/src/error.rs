// ================================================================
// File: wordlebot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required identifiers or settings could not be resolved.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The external conversion tool failed or produced no image.
    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Time zone error: {0}")]
    TimeZone(String),
}

impl From<twilight_http::Error> for Error {
    fn from(err: twilight_http::Error) -> Self {
        Error::Platform(format!("Discord HTTP error: {err}"))
    }
}

impl From<twilight_http::response::DeserializeBodyError> for Error {
    fn from(err: twilight_http::response::DeserializeBodyError) -> Self {
        Error::Platform(format!("Discord response body error: {err}"))
    }
}

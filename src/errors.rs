//! Unified application error type.
//! Every module (api, core, sync, export, db, cli) returns AppError so that
//! the binary has a single place where failures are reported.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local operation log
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Transport
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("Invalid HTTP request: {0}")]
    HttpRequest(#[from] hyper::http::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    // ---------------------------
    // Backend answers
    // ---------------------------
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("{0}")]
    InvalidCheckInCode(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0}")]
    InvalidInput(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Message the backend sent, if this error came from it.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            AppError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::Api { status: 404, .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;

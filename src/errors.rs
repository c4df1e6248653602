// errors.rs
use crate::domain::ReconcileError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, bad parameters) or downstream layers (DB, exports, reconciliation).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Reconciliation Error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal Server Error")]
    InternalError,
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            // Dataset contents the reconciler refuses are a caller problem.
            ServerError::Reconcile(_) => 422,
            _ => 500,
        }
    }
}

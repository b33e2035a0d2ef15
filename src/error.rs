//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::transaction::ValidationError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more transactions were invalid.
    ///
    /// Nothing is stored or computed when this error occurs.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// Two transactions loaded into the store share an ID.
    #[error("the transaction ID \"{0}\" is used more than once")]
    DuplicateTransactionId(String),

    /// The file used to seed the store could not be read or parsed.
    #[error("could not load the seed file: {0}")]
    SeedFile(String),

    /// The request body was not a JSON object of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A query parameter could not be parsed.
    #[error("invalid query parameter {0}")]
    InvalidQuery(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the lock on the transaction store.
    #[error("could not acquire the store lock")]
    StoreLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(error) => {
                let issues: Vec<_> = error
                    .issues
                    .iter()
                    .map(|issue| {
                        json!({
                            "transactionId": issue.label(),
                            "reason": issue.field.to_string(),
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid transaction", "issues": issues })),
                )
                    .into_response()
            }
            Error::InvalidQuery(_) | Error::InvalidRequestBody(_) => {
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            Error::DeleteMissingTransaction => error_response(
                StatusCode::NOT_FOUND,
                "The transaction could not be found. \
                It may have already been deleted.",
            ),
            Error::InvalidTimezoneError(timezone) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::StoreLockError => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong, check the server logs for more details.",
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, check the server logs for more details.",
                )
            }
        }
    }
}

/// A JSON response of the form `{"error": message}`.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

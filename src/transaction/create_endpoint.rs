//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Error,
    timezone::get_local_timezone,
    transaction::{
        core::TransactionRecord,
        store::{TransactionState, lock_store},
        validation::{ValidationError, validate_record},
    },
};

/// A route handler for creating a new transaction.
///
/// The `id` and `createdAt` fields of the body are ignored, the store assigns
/// both. Responds with the created transaction and the status code 201.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    body: Result<Json<TransactionRecord>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(record) = body
        .inspect_err(|rejection| tracing::debug!("rejected transaction body: {rejection}"))
        .map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let Some(local_timezone) = get_local_timezone(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone));
    };

    let new_transaction = validate_record(0, &record, local_timezone)
        .map_err(|issues| ValidationError { issues })?;

    let transaction = lock_store(&state.store)?.add(new_transaction, OffsetDateTime::now_utc());
    tracing::debug!("created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

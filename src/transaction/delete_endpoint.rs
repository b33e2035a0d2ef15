use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error,
    transaction::{
        core::TransactionId,
        store::{TransactionState, lock_store},
    },
};

/// A route handler for deleting a transaction.
///
/// Responds with the status code 404 if the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    lock_store(&state.store)?
        .delete(&transaction_id)
        .inspect_err(|error| {
            tracing::error!("Could not delete transaction {transaction_id}: {error}")
        })?;

    Ok(Json(json!({ "message": "Transaction deleted" })))
}

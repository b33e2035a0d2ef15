use axum::{Json, extract::State};

use crate::{
    Error,
    transaction::{
        core::Transaction,
        store::{TransactionState, lock_store},
    },
};

/// A route handler that responds with every transaction, most recent first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let store = lock_store(&state.store)?;

    Ok(Json(store.newest_first()))
}

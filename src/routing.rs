//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{Redirect, Response},
    routing::{delete, get},
};

use crate::{
    AppState,
    dashboard::get_dashboard_metrics,
    endpoints,
    error::error_response,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_API, get(get_dashboard_metrics))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard metrics.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_API)
}

async fn get_404_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

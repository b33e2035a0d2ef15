//! Dashboard HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::MetricsAggregator, calendar::ShortEnglishLabels, metrics::DashboardMetrics,
    },
    timezone::get_local_timezone,
    transaction::{RawDate, TransactionStore, lock_store, parse_transaction_date},
};

/// The state needed for computing the dashboard metrics.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store holding the guest's transactions.
    pub store: Arc<Mutex<TransactionStore>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Compute the metrics as if it were this date instead of the current
    /// time. Accepts the same formats as transaction dates.
    pub now: Option<String>,
}

/// Respond with the dashboard metrics for every stored transaction.
pub async fn get_dashboard_metrics(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardMetrics>, Error> {
    let local_timezone = get_local_timezone(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let now = match query.now {
        Some(text) => parse_transaction_date(&RawDate::Text(text), local_timezone)
            .map_err(|error| Error::InvalidQuery(format!("now: {error}")))?
            .instant(),
        None => OffsetDateTime::now_utc(),
    };

    // Copy the transactions out so the lock is not held while aggregating.
    let transactions = lock_store(&state.store)?.all().to_vec();

    let aggregator = MetricsAggregator::new(local_timezone, ShortEnglishLabels);

    Ok(Json(aggregator.compute_validated(&transactions, now)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use crate::{
        Error,
        dashboard::handlers::{DashboardQuery, DashboardState},
        timezone::LocalTimezone,
        transaction::{TransactionKind, TransactionRecord, TransactionStore},
    };

    use super::get_dashboard_metrics;

    fn get_test_state(local_timezone: &str) -> DashboardState {
        let records = vec![
            TransactionRecord::new("1", 100.0, TransactionKind::Income, "2024-01-10"),
            TransactionRecord::new("2", 30.0, TransactionKind::Expense, "2024-01-15")
                .category("Food"),
            TransactionRecord::new("3", 20.0, TransactionKind::Expense, "2024-02-01")
                .category("Food"),
        ];

        DashboardState {
            store: Arc::new(Mutex::new(
                TransactionStore::from_records(&records, LocalTimezone::default()).unwrap(),
            )),
            local_timezone: local_timezone.to_owned(),
        }
    }

    #[tokio::test]
    async fn computes_metrics_for_stored_transactions() {
        let query = DashboardQuery {
            now: Some("2024-02-01".to_owned()),
        };

        let metrics = get_dashboard_metrics(State(get_test_state("Etc/UTC")), Query(query))
            .await
            .unwrap()
            .0;

        assert_eq!(metrics.total_balance, 50.0);
        assert_eq!(metrics.expense_by_category[0].value, 50.0);
        assert_eq!(metrics.monthly_data[5].name, "Feb");
        assert_eq!(metrics.trend_data.len(), 3);
    }

    #[tokio::test]
    async fn defaults_to_current_time() {
        let metrics = get_dashboard_metrics(
            State(get_test_state("Etc/UTC")),
            Query(DashboardQuery::default()),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(metrics.monthly_data.len(), 6);
        assert_eq!(metrics.total_income, 100.0);
    }

    #[tokio::test]
    async fn rejects_invalid_now() {
        let query = DashboardQuery {
            now: Some("soon".to_owned()),
        };

        let result = get_dashboard_metrics(State(get_test_state("Etc/UTC")), Query(query)).await;

        assert!(matches!(result, Err(Error::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn rejects_now_out_of_range_of_local_timezone() {
        let query = DashboardQuery {
            now: Some("9999-12-31T23:00:00-05:00".to_owned()),
        };

        let result = get_dashboard_metrics(State(get_test_state("Etc/UTC")), Query(query)).await;

        assert!(matches!(result, Err(Error::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn rejects_invalid_timezone() {
        let result = get_dashboard_metrics(
            State(get_test_state("Not/A_Zone")),
            Query(DashboardQuery::default()),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidTimezoneError(_))));
    }
}

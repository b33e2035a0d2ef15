//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::transaction::TransactionStore;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-memory store of guest transactions.
    pub store: Arc<Mutex<TransactionStore>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] that serves the transactions in `store`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    pub fn new(store: TransactionStore, local_timezone: &str) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            local_timezone: local_timezone.to_owned(),
        }
    }
}

//! The in-memory store for guest transactions.
//!
//! Transactions only live for as long as the server process. The store can be
//! seeded from a JSON file when the server starts, but is never written back.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::extract::FromRef;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    timezone::LocalTimezone,
    transaction::{
        core::{NewTransaction, Transaction, TransactionId, TransactionRecord},
        validation::normalize_records,
    },
};

/// Holds the transactions of an anonymous user, newest additions first.
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    last_id: u64,
}

impl TransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from previously saved records, keeping their order.
    ///
    /// Records without an ID are given a new one.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::Validation] if any of the records are invalid,
    /// - or [Error::DuplicateTransactionId] if two records share an ID.
    pub fn from_records(
        records: &[TransactionRecord],
        timezone: LocalTimezone,
    ) -> Result<Self, Error> {
        let transactions = normalize_records(records, timezone)?;
        let mut store = Self::new();

        for transaction in transactions {
            if !transaction.id.is_empty() && store.contains(&transaction.id) {
                return Err(Error::DuplicateTransactionId(transaction.id));
            }

            store.transactions.push(transaction);
        }

        for index in 0..store.transactions.len() {
            if store.transactions[index].id.is_empty() {
                let id = store.next_id();
                store.transactions[index].id = id;
            }
        }

        Ok(store)
    }

    /// Load a store from a JSON file containing an array of transactions.
    ///
    /// # Errors
    /// Returns an [Error::SeedFile] if the file cannot be read or parsed, or
    /// any error from [TransactionStore::from_records].
    pub fn load(path: &Path, timezone: LocalTimezone) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|error| Error::SeedFile(format!("could not read {path:?}: {error}")))?;

        let records: Vec<TransactionRecord> = serde_json::from_str(&text)
            .map_err(|error| Error::SeedFile(format!("could not parse {path:?}: {error}")))?;

        Self::from_records(&records, timezone)
    }

    /// Add a transaction to the front of the store and return it.
    ///
    /// The transaction is given a fresh ID and `created_at` as its creation
    /// time.
    pub fn add(&mut self, new_transaction: NewTransaction, created_at: OffsetDateTime) -> Transaction {
        let transaction = new_transaction.finalize(self.next_id(), Some(created_at));
        self.transactions.insert(0, transaction.clone());

        transaction
    }

    /// Remove the transaction with `id` and return it.
    ///
    /// # Errors
    /// Returns an [Error::DeleteMissingTransaction] if there is no such
    /// transaction.
    pub fn delete(&mut self, id: &str) -> Result<Transaction, Error> {
        let position = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(Error::DeleteMissingTransaction)?;

        Ok(self.transactions.remove(position))
    }

    /// All transactions in store order.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// All transactions sorted by date, most recent first.
    ///
    /// Transactions on the same instant keep their store order.
    pub fn newest_first(&self) -> Vec<Transaction> {
        let mut transactions = self.transactions.clone();
        transactions.sort_by(|a, b| b.date.instant().cmp(&a.date.instant()));
        transactions
    }

    /// The number of transactions in the store.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the store has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn contains(&self, id: &str) -> bool {
        self.transactions
            .iter()
            .any(|transaction| transaction.id == id)
    }

    fn next_id(&mut self) -> TransactionId {
        loop {
            self.last_id += 1;
            let id = self.last_id.to_string();

            if !self.contains(&id) {
                return id;
            }
        }
    }
}

/// The state needed to read or change transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store holding the guest's transactions.
    pub store: Arc<Mutex<TransactionStore>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Acquire the lock on the transaction store.
///
/// # Errors
/// Returns an [Error::StoreLockError] if the lock is poisoned.
pub fn lock_store(store: &Mutex<TransactionStore>) -> Result<MutexGuard<'_, TransactionStore>, Error> {
    store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire the store lock: {error}"))
        .map_err(|_| Error::StoreLockError)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use time::macros::{datetime, offset};

    use crate::{
        Error,
        timezone::LocalTimezone,
        transaction::core::{
            Transaction, TransactionDate, TransactionKind, TransactionRecord,
        },
    };

    use super::TransactionStore;

    fn new_expense(day: u8) -> crate::transaction::core::NewTransaction {
        let instant = datetime!(2024-01-01 12:00 UTC).replace_day(day).unwrap();
        Transaction::build(10.0, TransactionKind::Expense, TransactionDate::from_instant(instant))
            .category("Food")
    }

    #[test]
    fn add_puts_newest_addition_first_with_fresh_ids() {
        let mut store = TransactionStore::new();
        let created_at = datetime!(2024-02-01 9:00 UTC);

        let first = store.add(new_expense(1), created_at);
        let second = store.add(new_expense(2), created_at);

        assert_ne!(first.id, second.id);
        assert_eq!(second.created_at, Some(created_at));
        assert_eq!(store.all()[0], second);
        assert_eq!(store.all()[1], first);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_removes_transaction() {
        let mut store = TransactionStore::new();
        let created_at = datetime!(2024-02-01 9:00 UTC);
        let transaction = store.add(new_expense(1), created_at);

        let deleted = store.delete(&transaction.id).unwrap();

        assert_eq!(deleted, transaction);
        assert!(store.is_empty());
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let mut store = TransactionStore::new();

        assert_eq!(store.delete("42"), Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = TransactionStore::new();
        let created_at = datetime!(2024-02-01 9:00 UTC);
        let first = store.add(new_expense(1), created_at);
        store.delete(&first.id).unwrap();

        let second = store.add(new_expense(2), created_at);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn newest_first_sorts_by_date_descending() {
        let mut store = TransactionStore::new();
        let created_at = datetime!(2024-02-01 9:00 UTC);
        let middle = store.add(new_expense(15), created_at);
        let oldest = store.add(new_expense(1), created_at);
        let newest = store.add(new_expense(30), created_at);

        let sorted = store.newest_first();

        assert_eq!(sorted, vec![newest, middle, oldest]);
    }

    #[test]
    fn from_records_assigns_missing_ids_without_collisions() {
        let mut without_id =
            TransactionRecord::new("", 5.0, TransactionKind::Income, "2024-01-02");
        without_id.id = None;
        let records = vec![
            TransactionRecord::new("1", 10.0, TransactionKind::Income, "2024-01-01"),
            without_id,
        ];

        let store = TransactionStore::from_records(&records, LocalTimezone::default()).unwrap();

        assert_eq!(store.all()[0].id, "1");
        assert_eq!(store.all()[1].id, "2");
    }

    #[test]
    fn from_records_rejects_duplicate_ids() {
        let records = vec![
            TransactionRecord::new("a", 10.0, TransactionKind::Income, "2024-01-01"),
            TransactionRecord::new("a", 5.0, TransactionKind::Expense, "2024-01-02"),
        ];

        let result = TransactionStore::from_records(&records, LocalTimezone::default());

        assert_eq!(
            result.map(|store| store.len()),
            Err(Error::DuplicateTransactionId("a".to_owned()))
        );
    }

    #[test]
    fn from_records_rejects_invalid_records() {
        let records = vec![TransactionRecord::new(
            "a",
            10.0,
            TransactionKind::Income,
            "not a date",
        )];

        let result = TransactionStore::from_records(&records, LocalTimezone::default());

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn load_reads_json_array() {
        let path = std::env::temp_dir().join(format!(
            "budget_buddy_store_test_{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"id": "x", "amount": 12.5, "type": "expense", "category": "Food",
                "description": "", "date": "2024-01-10T08:00:00.000Z"}}]"#
        )
        .unwrap();

        let store = TransactionStore::load(&path, offset!(+13).into()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].category, "Food");
        assert_eq!(store.all()[0].date.day(), time::macros::date!(2024 - 01 - 10));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("budget_buddy_file_that_does_not_exist.json");

        let result = TransactionStore::load(&path, LocalTimezone::default());

        assert!(matches!(result, Err(Error::SeedFile(_))));
    }
}

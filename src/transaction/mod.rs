//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the raw `TransactionRecord` clients send
//! - Date normalization and validation at the boundary of the app
//! - The in-memory guest store and the JSON route handlers for it

mod core;
mod create_endpoint;
mod date;
mod delete_endpoint;
mod list_endpoint;
mod store;
mod validation;

pub use core::{
    NewTransaction, RawAmount, RawDate, Transaction, TransactionDate, TransactionId,
    TransactionKind, TransactionRecord,
};
pub use create_endpoint::create_transaction_endpoint;
pub use date::{DateError, parse_transaction_date};
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use store::{TransactionState, TransactionStore, lock_store};
pub use validation::{
    InvalidField, ValidationError, ValidationIssue, normalize_records, validate_record,
};

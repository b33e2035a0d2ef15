//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the opaque string used to identify a transaction.
pub type TransactionId = String;

/// Whether money was earned or spent.
///
/// The sign of a transaction is derived from its kind, amounts are always
/// stored as non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money that was earned, e.g. a salary payment.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(other.to_owned()),
        }
    }
}

/// A normalized transaction date.
///
/// Holds both the exact instant, which is used for ordering, and the calendar
/// day the instant falls on in the offset the date was normalized with, which
/// is used for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionDate {
    instant: OffsetDateTime,
    day: Date,
}

impl TransactionDate {
    /// Create a date from an instant. The calendar day is read from the
    /// instant's own offset.
    pub fn from_instant(instant: OffsetDateTime) -> Self {
        Self {
            instant,
            day: instant.date(),
        }
    }

    /// The exact point in time of the transaction.
    pub fn instant(&self) -> OffsetDateTime {
        self.instant
    }

    /// The calendar day of the transaction.
    pub fn day(&self) -> Date {
        self.day
    }
}

impl Serialize for TransactionDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self
            .instant
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&text)
    }
}

/// An expense or income that has passed validation.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// A free-text label used to group transactions, e.g. "Groceries".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: TransactionDate,
    /// When the transaction was recorded, if known.
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(amount: f64, kind: TransactionKind, date: TransactionDate) -> NewTransaction {
        NewTransaction {
            amount,
            kind,
            category: String::new(),
            description: String::new(),
            date,
        }
    }

    /// The amount with the sign implied by the transaction kind, i.e.
    /// positive for income and negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Call [NewTransaction::finalize] once an ID has been chosen for the
/// transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The non-negative amount of the transaction.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The category label. Blank labels are kept as-is.
    pub category: String,
    /// A human-readable description, empty by default.
    pub description: String,
    /// When the transaction happened.
    pub date: TransactionDate,
}

impl NewTransaction {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }

    /// Turn the builder into a [Transaction] with the given `id`.
    pub fn finalize(self, id: TransactionId, created_at: Option<OffsetDateTime>) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            description: self.description,
            date: self.date,
            created_at,
        }
    }
}

/// A date as it arrives from a client or a file, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// A date string such as "2024-01-10" or "2024-01-10T08:30:00Z".
    Text(String),
    /// Milliseconds since the Unix epoch, possibly with a fractional part.
    Timestamp(f64),
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        RawDate::Text(value.to_owned())
    }
}

/// An amount as it arrives from a client or a file, either a JSON number or
/// a numeric string such as "42.50".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A JSON number.
    Number(f64),
    /// A string that should contain a number.
    Text(String),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

/// A transaction as it arrives from a client or a file.
///
/// Every field is optional or defaulted so that missing values can be
/// reported by validation instead of failing deserialization outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The ID of the transaction, if it has one yet.
    #[serde(default)]
    pub id: Option<TransactionId>,
    /// The non-negative amount of the transaction.
    #[serde(default)]
    pub amount: Option<RawAmount>,
    /// Either "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// The category label.
    #[serde(default)]
    pub category: String,
    /// A text description of the transaction.
    #[serde(default)]
    pub description: String,
    /// When the transaction happened.
    #[serde(default)]
    pub date: Option<RawDate>,
    /// When the transaction was recorded. Not used for any calculations.
    #[serde(default)]
    pub created_at: Option<RawDate>,
}

impl TransactionRecord {
    /// Create a record with the required fields set.
    pub fn new(id: &str, amount: f64, kind: TransactionKind, date: impl Into<RawDate>) -> Self {
        Self {
            id: Some(id.to_owned()),
            amount: Some(RawAmount::Number(amount)),
            kind: Some(kind.as_str().to_owned()),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    /// Set the category for the record.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Set the description for the record.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }
}

//! Validation of raw [TransactionRecord]s at the boundary of the app.
//!
//! A batch of records is either accepted in full or rejected with every
//! problem found, so a dashboard is never built from silently dropped data.

use std::fmt::Display;

use crate::{
    timezone::LocalTimezone,
    transaction::{
        core::{NewTransaction, RawAmount, Transaction, TransactionKind, TransactionRecord},
        date::{DateError, parse_transaction_date},
    },
};

/// Why a single transaction was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidField {
    /// The `amount` field was not provided.
    #[error("the amount is missing")]
    MissingAmount,

    /// The amount was below zero. The sign of a transaction comes from its type.
    #[error("the amount {0} is negative")]
    NegativeAmount(f64),

    /// The amount was a string that does not contain a number.
    #[error("\"{0}\" is not a number")]
    UnrecognisedAmount(String),

    /// The amount was NaN or infinite.
    #[error("the amount is not a finite number")]
    NonFiniteAmount,

    /// The `type` field was not provided.
    #[error("the type is missing")]
    MissingType,

    /// The `type` field was something other than "income" or "expense".
    #[error("\"{0}\" is not a transaction type, expected \"income\" or \"expense\"")]
    UnknownType(String),

    /// The `date` field was not provided.
    #[error("the date is missing")]
    MissingDate,

    /// The `date` field could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(#[from] DateError),
}

/// A problem with one transaction in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// The position of the transaction in the batch.
    pub index: usize,
    /// The ID of the transaction, if it had one.
    pub transaction_id: Option<String>,
    /// What was wrong with the transaction.
    pub field: InvalidField,
}

impl ValidationIssue {
    /// The transaction ID, or its position in the batch when it has no ID.
    pub fn label(&self) -> String {
        match &self.transaction_id {
            Some(id) => id.clone(),
            None => format!("#{}", self.index),
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transaction {}: {}", self.label(), self.field)
    }
}

/// One or more transactions could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} invalid transaction field(s): {}", .issues.len(), join_issues(.issues))]
pub struct ValidationError {
    /// Every problem that was found, in input order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// The labels of the offending transactions, without duplicates, in input
    /// order.
    pub fn transaction_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();

        for issue in &self.issues {
            let label = issue.label();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }

        labels
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ValidationIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a single record and turn it into a [NewTransaction].
///
/// `index` is the position of the record in its batch and is only used to
/// label issues for records without an ID.
///
/// # Errors
/// Returns every [ValidationIssue] found in the record.
pub fn validate_record(
    index: usize,
    record: &TransactionRecord,
    timezone: LocalTimezone,
) -> Result<NewTransaction, Vec<ValidationIssue>> {
    let mut problems = Vec::new();

    let amount = match parse_amount(record.amount.as_ref()) {
        Err(problem) => {
            problems.push(problem);
            None
        }
        Ok(None) => {
            problems.push(InvalidField::MissingAmount);
            None
        }
        Ok(Some(amount)) if !amount.is_finite() => {
            problems.push(InvalidField::NonFiniteAmount);
            None
        }
        Ok(Some(amount)) if amount < 0.0 => {
            problems.push(InvalidField::NegativeAmount(amount));
            None
        }
        Ok(Some(amount)) => Some(amount),
    };

    let kind = match record.kind.as_deref().map(str::parse::<TransactionKind>) {
        None => {
            problems.push(InvalidField::MissingType);
            None
        }
        Some(Err(unknown)) => {
            problems.push(InvalidField::UnknownType(unknown));
            None
        }
        Some(Ok(kind)) => Some(kind),
    };

    let date = match &record.date {
        None => {
            problems.push(InvalidField::MissingDate);
            None
        }
        Some(raw) => parse_transaction_date(raw, timezone)
            .inspect_err(|error| problems.push(error.clone().into()))
            .ok(),
    };

    match (amount, kind, date) {
        (Some(amount), Some(kind), Some(date)) if problems.is_empty() => {
            Ok(Transaction::build(amount, kind, date)
                .category(&record.category)
                .description(&record.description))
        }
        _ => Err(problems
            .into_iter()
            .map(|field| ValidationIssue {
                index,
                transaction_id: record.id.clone(),
                field,
            })
            .collect()),
    }
}

/// Read the amount of a record. Numeric strings are accepted, blank strings
/// count as a missing amount.
fn parse_amount(raw: Option<&RawAmount>) -> Result<Option<f64>, InvalidField> {
    match raw {
        None => Ok(None),
        Some(RawAmount::Number(amount)) => Ok(Some(*amount)),
        Some(RawAmount::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawAmount::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| InvalidField::UnrecognisedAmount(text.clone())),
    }
}

/// Validate a batch of records, taking calendar days in the local `timezone`.
///
/// Records without an ID get an empty ID. `createdAt` is carried over when it
/// parses and dropped otherwise since nothing is calculated from it.
///
/// # Errors
/// Returns a [ValidationError] listing every issue in the batch if any record
/// is invalid. No transactions are returned in that case.
pub fn normalize_records(
    records: &[TransactionRecord],
    timezone: LocalTimezone,
) -> Result<Vec<Transaction>, ValidationError> {
    let mut transactions = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match validate_record(index, record, timezone) {
            Ok(new_transaction) => {
                let created_at = record
                    .created_at
                    .as_ref()
                    .and_then(|raw| parse_transaction_date(raw, timezone).ok())
                    .map(|date| date.instant());

                transactions.push(
                    new_transaction.finalize(record.id.clone().unwrap_or_default(), created_at),
                );
            }
            Err(mut record_issues) => issues.append(&mut record_issues),
        }
    }

    if issues.is_empty() {
        Ok(transactions)
    } else {
        Err(ValidationError { issues })
    }
}

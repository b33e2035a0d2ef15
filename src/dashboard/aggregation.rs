//! Transaction aggregation for the dashboard.
//!
//! Turns a list of transactions into totals, category breakdowns, monthly
//! buckets and a running balance trend. Everything here is pure: the current
//! time is passed in and nothing is logged.

use time::{Date, OffsetDateTime};

use crate::{
    dashboard::{
        calendar::{CalendarLabels, CalendarMonth, ShortEnglishLabels},
        metrics::{
            BalancePoint, CategoryTotal, DashboardMetrics, MAX_TREND_POINTS, MONTHS_IN_WINDOW,
            MonthlySummary,
        },
        ordered_map::InsertionOrderedMap,
    },
    timezone::LocalTimezone,
    transaction::{
        Transaction, TransactionKind, TransactionRecord, ValidationError, normalize_records,
    },
};

/// Computes [DashboardMetrics] from transactions.
///
/// `timezone` decides which calendar day and month an instant falls in, and
/// `labels` decides how months and days are displayed.
#[derive(Debug, Clone)]
pub struct MetricsAggregator<L = ShortEnglishLabels> {
    timezone: LocalTimezone,
    labels: L,
}

impl Default for MetricsAggregator<ShortEnglishLabels> {
    fn default() -> Self {
        Self::new(LocalTimezone::default(), ShortEnglishLabels)
    }
}

impl<L: CalendarLabels> MetricsAggregator<L> {
    /// Create an aggregator for the given timezone and labels.
    pub fn new(timezone: LocalTimezone, labels: L) -> Self {
        Self { timezone, labels }
    }

    /// Validate `records` and compute the metrics for them.
    ///
    /// # Errors
    /// Returns a [ValidationError] listing every invalid record. No metrics
    /// are computed if any record is invalid.
    pub fn compute(
        &self,
        records: &[TransactionRecord],
        now: OffsetDateTime,
    ) -> Result<DashboardMetrics, ValidationError> {
        let transactions = normalize_records(records, self.timezone)?;

        Ok(self.compute_validated(&transactions, now))
    }

    /// Compute the metrics for transactions that have already been validated.
    ///
    /// The calendar day of each transaction is the one it was normalized with.
    pub fn compute_validated(
        &self,
        transactions: &[Transaction],
        now: OffsetDateTime,
    ) -> DashboardMetrics {
        let (total_income, total_expense) = sum_totals(transactions);

        DashboardMetrics {
            total_balance: total_income - total_expense,
            total_income,
            total_expense,
            expense_by_category: group_by_category(transactions, TransactionKind::Expense),
            income_by_category: group_by_category(transactions, TransactionKind::Income),
            monthly_data: self.summarize_months(transactions, now),
            trend_data: self.calculate_balance_trend(transactions),
        }
    }

    /// Sums income and expenses into the current month and the months before
    /// it. Months with no transactions are still included, and transactions
    /// outside the window are ignored.
    ///
    /// A `now` whose local date is out of range is read in its own offset.
    fn summarize_months(
        &self,
        transactions: &[Transaction],
        now: OffsetDateTime,
    ) -> Vec<MonthlySummary> {
        let local_now = self.timezone.to_local(now).unwrap_or(now);
        let current_month = CalendarMonth::of(local_now.date());

        let mut buckets = InsertionOrderedMap::new();
        for month in current_month.trailing(MONTHS_IN_WINDOW) {
            buckets.upsert(month, MonthlySummary::default());
        }

        for transaction in transactions {
            let month = CalendarMonth::of(transaction.date.day());

            if let Some(bucket) = buckets.get_mut(&month) {
                match transaction.kind {
                    TransactionKind::Income => bucket.income += transaction.amount,
                    TransactionKind::Expense => bucket.expense += transaction.amount,
                }
            }
        }

        buckets
            .into_entries()
            .into_iter()
            .map(|(month, summary)| MonthlySummary {
                name: self.labels.month_label(month.year, month.month),
                ..summary
            })
            .collect()
    }

    /// Calculates the running balance at the end of each day that has
    /// transactions, keeping only the most recent [MAX_TREND_POINTS] days.
    fn calculate_balance_trend(&self, transactions: &[Transaction]) -> Vec<BalancePoint> {
        let mut balance = 0.0;
        let mut balance_by_day: InsertionOrderedMap<Date, f64> = InsertionOrderedMap::new();

        for transaction in sort_chronologically(transactions) {
            balance += transaction.signed_amount();
            balance_by_day.upsert(transaction.date.day(), balance);
        }

        let skip = balance_by_day.len().saturating_sub(MAX_TREND_POINTS);

        balance_by_day
            .into_entries()
            .into_iter()
            .skip(skip)
            .map(|(day, balance)| BalancePoint {
                date: self.labels.day_label(day),
                balance,
            })
            .collect()
    }
}

/// Validate `records` and compute their metrics in UTC with English labels.
///
/// # Errors
/// Returns a [ValidationError] if any record is invalid.
pub fn compute_metrics(
    records: &[TransactionRecord],
    now: OffsetDateTime,
) -> Result<DashboardMetrics, ValidationError> {
    MetricsAggregator::<ShortEnglishLabels>::default().compute(records, now)
}

/// Sorts transactions from oldest to newest. Transactions at the same instant
/// keep their input order.
fn sort_chronologically(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|transaction| transaction.date.instant());
    sorted
}

/// Returns the total income and total expenses.
fn sum_totals(transactions: &[Transaction]) -> (f64, f64) {
    transactions
        .iter()
        .fold((0.0, 0.0), |(income, expense), transaction| {
            match transaction.kind {
                TransactionKind::Income => (income + transaction.amount, expense),
                TransactionKind::Expense => (income, expense + transaction.amount),
            }
        })
}

/// Sums the amounts of transactions of `kind` by category, in the order the
/// categories first appear.
fn group_by_category(transactions: &[Transaction], kind: TransactionKind) -> Vec<CategoryTotal> {
    let mut totals: InsertionOrderedMap<&str, f64> = InsertionOrderedMap::new();

    for transaction in transactions.iter().filter(|t| t.kind == kind) {
        *totals.entry_or_default(transaction.category.as_str()) += transaction.amount;
    }

    totals
        .into_entries()
        .into_iter()
        .map(|(name, value)| CategoryTotal {
            name: name.to_owned(),
            value,
        })
        .collect()
}

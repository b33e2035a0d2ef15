//! The data a dashboard renders.

use serde::{Deserialize, Serialize};

/// The number of months shown in the monthly activity chart.
pub const MONTHS_IN_WINDOW: usize = 6;

/// The maximum number of points in the balance trend chart.
pub const MAX_TREND_POINTS: usize = 15;

/// Everything the dashboard shows, derived from a list of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Total income minus total expenses.
    pub total_balance: f64,
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Expenses summed by category, in the order categories first appear.
    pub expense_by_category: Vec<CategoryTotal>,
    /// Income summed by category, in the order categories first appear.
    pub income_by_category: Vec<CategoryTotal>,
    /// Income and expenses for the current month and the five before it,
    /// oldest first.
    pub monthly_data: Vec<MonthlySummary>,
    /// The running balance at the end of each day with transactions, for at
    /// most the last [MAX_TREND_POINTS] days.
    pub trend_data: Vec<BalancePoint>,
}

/// The total for one category, usable as a chart slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category label.
    pub name: String,
    /// The summed amount.
    pub value: f64,
}

/// Income and expenses in one calendar month.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The month label, e.g. "Jan".
    pub name: String,
    /// The sum of income in the month.
    pub income: f64,
    /// The sum of expenses in the month.
    pub expense: f64,
}

/// The running balance at the end of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    /// The day label, e.g. "Jan 5".
    pub date: String,
    /// Income minus expenses up to and including the day.
    pub balance: f64,
}

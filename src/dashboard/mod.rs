//! Dashboard module
//!
//! Turns the guest's transactions into the totals, category breakdowns,
//! monthly activity and balance trend shown on the dashboard.

mod aggregation;
mod calendar;
mod handlers;
mod metrics;
mod ordered_map;

pub use aggregation::{MetricsAggregator, compute_metrics};
pub use calendar::{CalendarLabels, CalendarMonth, ShortEnglishLabels};
pub use handlers::{DashboardQuery, DashboardState, get_dashboard_metrics};
pub use metrics::{
    BalancePoint, CategoryTotal, DashboardMetrics, MAX_TREND_POINTS, MONTHS_IN_WINDOW,
    MonthlySummary,
};

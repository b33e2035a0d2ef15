//! Labels for the calendar months and days shown on the dashboard.

use time::{Date, Month};

/// Produces the display labels used for monthly buckets and trend points.
///
/// Implement this to change the locale of the labels.
pub trait CalendarLabels {
    /// The label for a calendar month, e.g. "Jan".
    fn month_label(&self, year: i32, month: Month) -> String;

    /// The label for a calendar day, e.g. "Jan 5".
    fn day_label(&self, date: Date) -> String;
}

/// English three-letter month abbreviations, with unpadded day numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortEnglishLabels;

impl CalendarLabels for ShortEnglishLabels {
    fn month_label(&self, _year: i32, month: Month) -> String {
        short_month_name(month).to_owned()
    }

    fn day_label(&self, date: Date) -> String {
        format!("{} {}", short_month_name(date.month()), date.day())
    }
}

fn short_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// A month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarMonth {
    /// The calendar year.
    pub year: i32,
    /// The month of the year.
    pub month: Month,
}

impl CalendarMonth {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// The `count` consecutive months ending with this one, oldest first.
    pub fn trailing(self, count: usize) -> Vec<Self> {
        let mut months = Vec::with_capacity(count);
        let mut month = self;

        for _ in 0..count {
            months.push(month);
            month = month.previous();
        }

        months.reverse();
        months
    }
}

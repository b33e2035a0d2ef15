//! Conversion of canonical timezone names into the offsets used for calendar dates.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, PrimitiveDateTimeExt, TimeZone, Tz};

/// The timezone used to decide which calendar day an instant falls on.
///
/// A named timezone picks the offset in effect at each instant, so dates on
/// either side of a daylight saving change each get their own offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimezone {
    /// The same offset for every instant.
    Fixed(UtcOffset),
    /// A timezone from the IANA database, e.g. "Pacific/Auckland".
    Named(&'static Tz),
}

impl Default for LocalTimezone {
    fn default() -> Self {
        Self::Fixed(UtcOffset::UTC)
    }
}

impl From<UtcOffset> for LocalTimezone {
    fn from(offset: UtcOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl LocalTimezone {
    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self {
            LocalTimezone::Fixed(offset) => *offset,
            LocalTimezone::Named(tz) => tz.get_offset_utc(&instant).to_utc(),
        }
    }

    /// Convert `instant` to the local time in this timezone.
    ///
    /// Returns `None` if the local time falls outside the range of
    /// representable dates.
    pub fn to_local(&self, instant: OffsetDateTime) -> Option<OffsetDateTime> {
        instant.checked_to_offset(self.offset_at(instant))
    }

    /// Attach this timezone to a wall clock time.
    ///
    /// The calendar date and time are kept as given. A time repeated by a
    /// backward change takes the earlier offset, and a time skipped by a
    /// forward change takes the offset in effect after the change.
    pub fn assume_local(&self, date_time: PrimitiveDateTime) -> OffsetDateTime {
        match self {
            LocalTimezone::Fixed(offset) => date_time.assume_offset(*offset),
            LocalTimezone::Named(tz) => date_time
                .assume_timezone(*tz)
                .take_first()
                .unwrap_or_else(|| date_time.assume_timezone_utc(*tz)),
        }
    }
}

/// Get the timezone for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_timezone(canonical_timezone: &str) -> Option<LocalTimezone> {
    time_tz::timezones::get_by_name(canonical_timezone).map(LocalTimezone::Named)
}

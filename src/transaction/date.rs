//! Normalization of the date values clients send into [TransactionDate]s.
//!
//! Dates may arrive as RFC 3339 strings, as date-times without an offset, as
//! plain calendar dates, or as Unix timestamps in milliseconds. Instants are
//! converted to the offset the local timezone had at that instant before the
//! calendar day is taken.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    timezone::LocalTimezone,
    transaction::core::{RawDate, TransactionDate},
};

/// The reasons a date could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The string did not match any of the supported formats.
    #[error("\"{0}\" is not a recognised date")]
    Unrecognised(String),

    /// The date is outside the range of representable dates once converted
    /// to the local timezone.
    #[error("{0} is out of the supported date range")]
    OutOfRange(String),
}

/// Normalize `raw` into a [TransactionDate] in the local `timezone`.
///
/// Date-only strings name a calendar day directly and are never shifted
/// across a day boundary: "2024-01-10" is January 10th whatever the timezone.
/// Fractional timestamps are truncated to whole milliseconds.
///
/// # Errors
/// Returns a [DateError] if the value cannot be parsed or is out of range.
pub fn parse_transaction_date(
    raw: &RawDate,
    timezone: LocalTimezone,
) -> Result<TransactionDate, DateError> {
    match raw {
        RawDate::Text(text) => parse_date_text(text.trim(), timezone),
        RawDate::Timestamp(millis) => {
            let out_of_range = || DateError::OutOfRange(millis.to_string());

            if !millis.is_finite() {
                return Err(out_of_range());
            }

            // Float to int casts saturate, anything that large is rejected below.
            let nanos = (millis.trunc() as i128).saturating_mul(1_000_000);
            let instant =
                OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|_| out_of_range())?;

            to_local_date(instant, timezone).ok_or_else(out_of_range)
        }
    }
}

fn parse_date_text(text: &str, timezone: LocalTimezone) -> Result<TransactionDate, DateError> {
    if let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339) {
        return to_local_date(instant, timezone)
            .ok_or_else(|| DateError::OutOfRange(text.to_owned()));
    }

    let local_date_time = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    );
    if let Ok(date_time) = PrimitiveDateTime::parse(text, local_date_time) {
        return Ok(TransactionDate::from_instant(
            timezone.assume_local(date_time),
        ));
    }

    let date_only = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(text, date_only) {
        return Ok(TransactionDate::from_instant(
            timezone.assume_local(date.midnight()),
        ));
    }

    Err(DateError::Unrecognised(text.to_owned()))
}

fn to_local_date(instant: OffsetDateTime, timezone: LocalTimezone) -> Option<TransactionDate> {
    timezone.to_local(instant).map(TransactionDate::from_instant)
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime, offset};

    use crate::{
        timezone::{LocalTimezone, get_local_timezone},
        transaction::core::RawDate,
    };

    use super::{DateError, parse_transaction_date};

    const UTC: LocalTimezone = LocalTimezone::Fixed(time::UtcOffset::UTC);

    fn auckland() -> LocalTimezone {
        get_local_timezone("Pacific/Auckland").unwrap()
    }

    #[test]
    fn parses_date_only_string_as_that_day() {
        let result = parse_transaction_date(&"2024-01-10".into(), offset!(-5).into()).unwrap();

        assert_eq!(result.day(), date!(2024 - 01 - 10));
        assert_eq!(result.instant(), datetime!(2024-01-10 0:00 -5));
    }

    #[test]
    fn converts_rfc3339_string_to_local_timezone() {
        let result =
            parse_transaction_date(&"2024-01-10T20:00:00.000Z".into(), offset!(+13).into())
                .unwrap();

        assert_eq!(result.day(), date!(2024 - 01 - 11));
        assert_eq!(result.instant(), datetime!(2024-01-10 20:00 UTC));
    }

    #[test]
    fn parses_date_time_without_offset_in_local_timezone() {
        let result =
            parse_transaction_date(&"2024-01-10T08:30".into(), offset!(+2).into()).unwrap();

        assert_eq!(result.instant(), datetime!(2024-01-10 8:30 +2));

        let result = parse_transaction_date(&"2024-01-10T08:30:15.250".into(), UTC).unwrap();

        assert_eq!(result.instant(), datetime!(2024-01-10 8:30:15.25 UTC));
    }

    #[test]
    fn uses_daylight_saving_offset_of_each_date() {
        // 23:30 on July 10th in NZST (+12), but already July 11th in NZDT (+13).
        let winter = parse_transaction_date(&"2024-07-10T11:30:00Z".into(), auckland()).unwrap();
        // 00:30 on January 11th in NZDT (+13).
        let summer = parse_transaction_date(&"2024-01-10T11:30:00Z".into(), auckland()).unwrap();

        assert_eq!(winter.day(), date!(2024 - 07 - 10));
        assert_eq!(summer.day(), date!(2024 - 01 - 11));
    }

    #[test]
    fn date_only_strings_keep_their_day_in_named_timezone() {
        let winter = parse_transaction_date(&"2024-07-10".into(), auckland()).unwrap();
        let summer = parse_transaction_date(&"2024-01-10".into(), auckland()).unwrap();

        assert_eq!(winter.instant(), datetime!(2024-07-10 0:00 +12));
        assert_eq!(summer.instant(), datetime!(2024-01-10 0:00 +13));
    }

    #[test]
    fn parses_millisecond_timestamp() {
        let result = parse_transaction_date(&RawDate::Timestamp(1_704_844_800_000.0), UTC).unwrap();

        assert_eq!(result.day(), date!(2024 - 01 - 10));
    }

    #[test]
    fn truncates_fractional_timestamp() {
        let result = parse_transaction_date(&RawDate::Timestamp(1_704_844_800_000.9), UTC).unwrap();

        assert_eq!(result.instant(), datetime!(2024-01-10 0:00 UTC));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let result = parse_transaction_date(&" 2024-02-01 ".into(), UTC).unwrap();

        assert_eq!(result.day(), date!(2024 - 02 - 01));
    }

    #[test]
    fn rejects_unrecognised_strings() {
        for text in ["", "yesterday", "2024-13-01", "10/01/2024"] {
            let result = parse_transaction_date(&text.into(), UTC);

            assert_eq!(
                result,
                Err(DateError::Unrecognised(text.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_timestamp() {
        let result = parse_transaction_date(&RawDate::Timestamp(1e300), UTC);

        assert!(matches!(result, Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn rejects_string_that_leaves_the_date_range_in_local_time() {
        let text = "9999-12-31T23:00:00-05:00";

        let result = parse_transaction_date(&text.into(), UTC);

        assert_eq!(result, Err(DateError::OutOfRange(text.to_owned())));
    }

    #[test]
    fn rejects_timestamp_that_leaves_the_date_range_in_local_time() {
        // 9999-12-31T23:59:59Z is already year 10000 in UTC+13.
        let result =
            parse_transaction_date(&RawDate::Timestamp(253_402_300_799_000.0), offset!(+13).into());

        assert!(matches!(result, Err(DateError::OutOfRange(_))));
    }
}

use crate::error::AppError;
use time::format_description::well_known::Rfc3339;
use time::macros::{datetime, format_description};
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

/// Legacy on-disk stand-in for "no due date".
pub const NO_DUE_DATE_SENTINEL: OffsetDateTime = datetime!(9999-01-01 0:00 UTC);
pub const NO_DATA_LABEL: &str = "No data";

/// Current time at the millisecond precision the record format can carry.
pub fn now() -> OffsetDateTime {
    truncate_to_millis(OffsetDateTime::now_utc())
}

/// Drops everything below the millisecond, the finest unit a record stores.
pub fn truncate_to_millis(value: OffsetDateTime) -> OffsetDateTime {
    value.replace_millisecond(value.millisecond()).unwrap_or(value)
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn format_iso(value: OffsetDateTime) -> Result<String, AppError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn parse_iso(value: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map_err(|_| AppError::invalid_data(format!("'{value}' is not an ISO-8601 timestamp")))
}

/// `dd/mm/yyyy` in the given offset.
pub fn format_display(value: OffsetDateTime, offset: UtcOffset) -> String {
    value
        .to_offset(offset)
        .format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| NO_DATA_LABEL.to_string())
}

pub fn format_due_display(value: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    match value {
        Some(due) => format_display(due, offset),
        None => NO_DATA_LABEL.to_string(),
    }
}

/// Files written from positive-offset zones store local 9999-01-01 as the
/// last day of 9998 in UTC, so that day counts as the sentinel too.
pub fn is_sentinel(value: OffsetDateTime) -> bool {
    value >= NO_DUE_DATE_SENTINEL - Duration::days(1)
}

pub fn due_date_from_stored(value: OffsetDateTime) -> Option<OffsetDateTime> {
    if is_sentinel(value) { None } else { Some(value) }
}

pub fn due_date_to_stored(value: Option<OffsetDateTime>) -> OffsetDateTime {
    value.unwrap_or(NO_DUE_DATE_SENTINEL)
}

/// Parses a due date typed as `yyyy/mm/dd` (or `yyyy-mm-dd`) into midnight at
/// `offset`.
///
/// Returns `None` for anything unparseable. Dates inside the sentinel window
/// of [`is_sentinel`] also give `None`: 9999-01-01 and, once shifted to UTC,
/// 9998-12-31 in any zone at or behind UTC, so typing `9998/12/31` there is
/// reported as an invalid date and stored as "No data".
pub fn parse_due_date(input: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let trimmed = input.trim();
    let separator = if trimmed.contains('/') { '/' } else { '-' };
    let parts: Vec<&str> = trimmed.split(separator).map(str::trim).collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };

    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let day: u8 = day.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    let date = Date::from_calendar_date(year, month, day).ok()?;
    let due = date.midnight().assume_offset(offset);

    due_date_from_stored(due)
}

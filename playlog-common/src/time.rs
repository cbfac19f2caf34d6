//! Timestamp utilities
//!
//! Playlist history endpoints report when a song aired as a bare time of day
//! in the station's local time ("11:45PM", "23:45"). [`normalize`] turns such
//! a string into an absolute UTC epoch by assuming the entry happened within
//! the last 24 hours at the station.
//!
//! Known limitation: the date inference is wrong when an entry is more than
//! 24 hours stale, or when the station's clock runs ahead of the reference
//! instant. In both cases the entry lands on the wrong day; nothing here tries
//! to detect it.

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use thiserror::Error;

/// Time normalization errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The time string lacks an hour:minute pair or holds non-numeric parts
    #[error("Malformed time string '{input}': {reason}")]
    MalformedTimeString { input: String, reason: String },

    /// Station UTC offset is not finite or outside ±24 hours
    #[error("Invalid UTC offset {0} hours")]
    InvalidUtcOffset(String),
}

impl TimeError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        TimeError::MalformedTimeString {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Largest accepted station offset from UTC, in hours
pub const MAX_UTC_OFFSET_HOURS: f64 = 24.0;

/// Converts a UTC offset in (possibly fractional) hours to whole seconds
pub fn offset_seconds(utc_offset: f64) -> Result<i64, TimeError> {
    if !utc_offset.is_finite() || utc_offset.abs() > MAX_UTC_OFFSET_HOURS {
        return Err(TimeError::InvalidUtcOffset(utc_offset.to_string()));
    }
    Ok((utc_offset * 3600.0).round() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses "H:MM", "HH:MM", "H:MMam", "HH:MM PM" and similar into a 24-hour
/// (hour, minute) pair.
///
/// Any components after the minute (seconds and so on) are ignored. Without
/// a "pm" suffix an hour of 12 means midnight; otherwise a suffix-less hour
/// is taken as a 24-hour value, as given.
pub fn parse_time_of_day(input: &str) -> Result<(u32, u32), TimeError> {
    let trimmed = input.trim();
    let (body, meridiem) = split_meridiem(trimmed);

    let mut parts = body.split(':');
    let hour_token = parts.next().unwrap_or_default().trim();
    let minute_token = match parts.next() {
        Some(token) => token.trim(),
        None => return Err(TimeError::malformed(input, "expected at least hour and minute")),
    };

    let hour: u32 = hour_token
        .parse()
        .map_err(|_| TimeError::malformed(input, format!("hour '{}' is not a number", hour_token)))?;
    let minute: u32 = minute_token
        .parse()
        .map_err(|_| TimeError::malformed(input, format!("minute '{}' is not a number", minute_token)))?;

    let hour = match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour + 12,
        Some(Meridiem::Pm) => hour,
        _ if hour == 12 => 0,
        _ => hour,
    };

    if hour > 23 || minute > 59 {
        return Err(TimeError::malformed(
            input,
            format!("{}:{:02} is not a valid time of day", hour, minute),
        ));
    }

    Ok((hour, minute))
}

/// Strips a trailing case-insensitive "am"/"pm" marker
fn split_meridiem(s: &str) -> (&str, Option<Meridiem>) {
    if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
        return (s, None);
    }

    let (body, suffix) = s.split_at(s.len() - 2);
    if suffix.eq_ignore_ascii_case("pm") {
        (body, Some(Meridiem::Pm))
    } else if suffix.eq_ignore_ascii_case("am") {
        (body, Some(Meridiem::Am))
    } else {
        (s, None)
    }
}

/// Returns the station's wall-clock "now" for a UTC reference instant
pub fn station_local_now(utc_offset: f64, reference: DateTime<Utc>) -> Result<NaiveDateTime, TimeError> {
    let offset = TimeDelta::try_seconds(offset_seconds(utc_offset)?)
        .ok_or_else(|| TimeError::InvalidUtcOffset(utc_offset.to_string()))?;
    reference
        .naive_utc()
        .checked_add_signed(offset)
        .ok_or_else(|| TimeError::InvalidUtcOffset(utc_offset.to_string()))
}

/// Resolves a station-local, date-less time string to UTC epoch seconds.
///
/// The calendar date is taken from the station's local "now" (`reference`
/// shifted by `utc_offset` hours). When the parsed time of day is later than
/// the station's current hour and minute, the entry cannot have aired yet
/// today, so it is placed on the previous day. The resulting local instant is
/// shifted back by the offset to give UTC.
pub fn normalize(time_str: &str, utc_offset: f64, reference: DateTime<Utc>) -> Result<i64, TimeError> {
    let (hour, minute) = parse_time_of_day(time_str)?;
    let station_now = station_local_now(utc_offset, reference)?;

    let mut date = station_now.date();
    if (hour, minute) > (station_now.hour(), station_now.minute()) {
        date = date
            .pred_opt()
            .ok_or_else(|| TimeError::malformed(time_str, "date out of range"))?;
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| TimeError::malformed(time_str, "invalid time of day"))?;
    let local = date.and_time(time);

    Ok(local.and_utc().timestamp() - offset_seconds(utc_offset)?)
}

//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct for the dates found in post
//! frontmatter, and formats them the way RSS 2.0 expects (`pubDate`,
//! `lastBuildDate`).
//!
//! # Accepted input
//!
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM:SS.fff`
//! - any of the above followed by `Z`, `+HH:MM`, `-HH:MM` or `+HHMM`
//!
//! A space may stand in for the `T`. Missing offsets are read as UTC, and
//! explicit offsets are folded into UTC so output is always `GMT`.
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2025-02-17T00:00:00.000Z")?;
//! assert_eq!(dt.to_rfc2822(), "Mon, 17 Feb 2025 00:00:00 GMT");
//! ```

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const SECS_PER_DAY: i64 = 86_400;

/// A date that could not be normalized, carrying the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date `{input}`: {reason}")]
pub struct DateFormatError {
    pub input: String,
    pub reason: String,
}

impl DateFormatError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Normalize an ISO 8601 date string to RFC 822 (`Mon, 17 Feb 2025 00:00:00 GMT`).
pub fn format_date(iso: &str) -> Result<String, DateFormatError> {
    DateTimeUtc::parse(iso).map(DateTimeUtc::to_rfc2822)
}

/// UTC datetime without timezone complexity
///
/// Field order matters: the derived `Ord` compares chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Current wall-clock time in UTC.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(i64::try_from(secs).unwrap_or(0))
    }

    /// Parse one of the ISO 8601 shapes listed in the module docs.
    pub fn parse(input: &str) -> Result<Self, DateFormatError> {
        let err = |reason: &str| DateFormatError::new(input, reason);
        let bytes = input.trim().as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(err("expected YYYY-MM-DD"));
        }
        let year = parse_u16(&bytes[0..4]).ok_or_else(|| err("year is not numeric"))?;
        let month = parse_u8(&bytes[5..7]).ok_or_else(|| err("month is not numeric"))?;
        let day = parse_u8(&bytes[8..10]).ok_or_else(|| err("day is not numeric"))?;

        if bytes.len() == 10 {
            let date = Self::from_ymd(year, month, day);
            date.validate().map_err(|reason| err(&reason))?;
            return Ok(date);
        }

        if !matches!(bytes[10], b'T' | b't' | b' ') {
            return Err(err("expected `T` between date and time"));
        }

        let time = &bytes[11..];
        if time.len() < 5 || time[2] != b':' {
            return Err(err("expected HH:MM after date"));
        }
        let hour = parse_u8(&time[0..2]).ok_or_else(|| err("hour is not numeric"))?;
        let minute = parse_u8(&time[3..5]).ok_or_else(|| err("minute is not numeric"))?;

        let mut pos = 5;
        let mut second = 0;
        if time.get(pos) == Some(&b':') {
            second = time
                .get(pos + 1..pos + 3)
                .and_then(parse_u8)
                .ok_or_else(|| err("second is not numeric"))?;
            pos += 3;

            // Fractional seconds are accepted and dropped
            if time.get(pos) == Some(&b'.') {
                pos += 1;
                let start = pos;
                while time.get(pos).is_some_and(u8::is_ascii_digit) {
                    pos += 1;
                }
                if pos == start {
                    return Err(err("empty fractional seconds"));
                }
            }
        }

        let offset_minutes = parse_offset(&time[pos..]).ok_or_else(|| err("invalid UTC offset"))?;

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().map_err(|reason| err(&reason))?;

        if offset_minutes == 0 {
            Ok(dt)
        } else {
            Ok(Self::from_unix(dt.to_unix() - offset_minutes * 60))
        }
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    fn validate(&self) -> Result<(), String> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            return Err(format!("month is invalid: {month}"));
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            return Err(format!("day is invalid: {day}"));
        }
        if hour > 23 {
            return Err(format!("hour is invalid: {hour}"));
        }
        if minute > 59 {
            return Err(format!("minute is invalid: {minute}"));
        }
        if second > 59 {
            return Err(format!("second is invalid: {second}"));
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix(self) -> i64 {
        let days = days_from_civil(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        );
        days * SECS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    // Components are range-bounded
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Self::new(
            year.clamp(0, 9999) as u16,
            month,
            day,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Format as RFC 822 / RFC 2822 with a `GMT` zone, as RSS 2.0 requires.
    pub fn to_rfc2822(self) -> String {
        const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        // Zeller's congruence for weekday calculation
        let weekday = self.weekday_index();

        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[weekday],
            self.day,
            MONTHS[(self.month - 1) as usize],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    #[inline]
    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    #[allow(clippy::cast_sign_loss)] // Result of rem_euclid(7) is always 0-6
    fn weekday_index(&self) -> usize {
        let (y, m) = if self.month < 3 {
            (i32::from(self.year) - 1, i32::from(self.month) + 12)
        } else {
            (i32::from(self.year), i32::from(self.month))
        };
        let d = i32::from(self.day);
        (d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400).rem_euclid(7) as usize
    }
}

/// Parse the zone suffix, returning the offset east of UTC in minutes.
fn parse_offset(bytes: &[u8]) -> Option<i64> {
    match bytes {
        [] | [b'Z' | b'z'] => Some(0),
        [sign @ (b'+' | b'-'), rest @ ..] => {
            let (hh, mm) = match rest {
                [h1, h2, b':', m1, m2] | [h1, h2, m1, m2] => ([*h1, *h2], [*m1, *m2]),
                [h1, h2] => ([*h1, *h2], [b'0', b'0']),
                _ => return None,
            };
            let hours = parse_u8(&hh)?;
            let minutes = parse_u8(&mm)?;
            if hours > 23 || minutes > 59 {
                return None;
            }
            let total = i64::from(hours) * 60 + i64::from(minutes);
            Some(if *sign == b'-' { -total } else { total })
        }
        _ => None,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year.rem_euclid(400);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // month/day are 1-31
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month as u8, day as u8)
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

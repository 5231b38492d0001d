//! ODM epoch parsing.
//!
//! Accepts the two ASCII time formats used by KVN messages, interpreted as UTC:
//! * calendar form `YYYY-MM-DDThh:mm:ss[.d*][Z]`
//! * day-of-year form `YYYY-DDDThh:mm:ss[.d*][Z]`
//!
//! Fractional seconds may have any number of digits; anything past nanoseconds is truncated.
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Maximum number of fractional second digits that can be represented.
const MAX_FRACTION_DIGITS: usize = 9;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("unrecognized time format")]
    Format,
    #[error("date out of range")]
    Date,
    #[error("time of day out of range")]
    Time,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse `s` into a UTC instant.
///
/// # Errors
/// [Error::Format] if `s` does not match either grammar, otherwise [Error::Date] or
/// [Error::Time] if a component is out of range.
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    let s = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    let (date, time) = s.split_once(['T', 't']).ok_or(Error::Format)?;
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(NaiveDateTime::new(date, time).and_utc())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [year, doy] => {
            let year = self::year(year)?;
            let doy = number::<u32>(doy, 3)?;
            NaiveDate::from_yo_opt(year, doy).ok_or(Error::Date)
        }
        [year, month, day] => {
            let year = self::year(year)?;
            let month = number::<u32>(month, 2)?;
            let day = number::<u32>(day, 2)?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::Date)
        }
        _ => Err(Error::Format),
    }
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    let (hms, fraction) = match s.split_once('.') {
        Some((hms, fraction)) => (hms, Some(fraction)),
        None => (s, None),
    };
    let parts: Vec<&str> = hms.split(':').collect();
    let [hour, minute, second] = parts.as_slice() else {
        return Err(Error::Format);
    };
    let hour = number::<u32>(hour, 2)?;
    let minute = number::<u32>(minute, 2)?;
    let second = number::<u32>(second, 2)?;
    let mut nanos = match fraction {
        Some(fraction) => fraction_nanos(fraction)?,
        None => 0,
    };

    // chrono represents a leap second as the 59th second plus an extra second of nanos
    let second = match (hour, minute, second) {
        (23, 59, 60) => {
            nanos += 1_000_000_000;
            59
        }
        (_, _, 60) => return Err(Error::Time),
        _ => second,
    };

    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or(Error::Time)
}

/// Convert fractional second digits to nanoseconds, truncating past nanosecond precision.
fn fraction_nanos(digits: &str) -> Result<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Format);
    }
    let digits = &digits[..digits.len().min(MAX_FRACTION_DIGITS)];
    let value: u32 = digits.parse().map_err(|_| Error::Format)?;
    Ok(value * 10u32.pow((MAX_FRACTION_DIGITS - digits.len()) as u32))
}

/// Years are always 4 digits.
fn year(s: &str) -> Result<i32> {
    if s.len() != 4 {
        return Err(Error::Format);
    }
    number(s, 4)
}

/// Parse an all-digit component of at most `max_width` digits.
fn number<T: std::str::FromStr>(s: &str, max_width: usize) -> Result<T> {
    if s.is_empty() || s.len() > max_width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Format);
    }
    s.parse().map_err(|_| Error::Format)
}

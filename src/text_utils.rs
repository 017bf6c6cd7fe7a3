use std::ops::Index;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS[.fff][ ]<offset>` and plain `YYYY-MM-DD`.
/// The offset is `Z`, `+HH`, `+HH:MM` or `+HHMM`. Values without an offset are taken as UTC.
pub fn parse_date_time(buf: &str) -> Result<DateTime<FixedOffset>, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ Tt](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(?:\.(\d{1,9}))?(?: ?(Z|z|[+-]\d{1,2}(?::?\d{2})?))?)?$"
        ).unwrap();
    }

    let buf = buf.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(buf) {
        return Ok(date_time);
    }

    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| caps.get(idx).map_or(Ok(0), |m| to_u32(m.as_str()));

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;
    let nanos: u32 = match caps.get(7) {
        // right-pad the fraction so ".5" means 500ms
        Some(frac) => to_u32(&format!("{:0<9}", frac.as_str()))?,
        None => 0,
    };

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid date {}", buf))?;
    let time = NaiveTime::from_hms_nano_opt(h, mn, s, nanos)
        .ok_or_else(|| format!("Invalid time {}", buf))?;

    let offset = match caps.get(8) {
        Some(tz) => parse_offset(tz.as_str(), buf)?,
        None => FixedOffset::east_opt(0).ok_or_else(|| "Invalid UTC offset".to_string())?,
    };
    NaiveDateTime::new(date, time)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| format!("Ambiguous date time {}", buf))
}

fn parse_offset(tz: &str, date_str: &str) -> Result<FixedOffset, String> {
    let (sign, digits) = match tz.chars().next() {
        Some('+') => (1, &tz[1..]),
        Some('-') => (-1, &tz[1..]),
        _ => return FixedOffset::east_opt(0).ok_or_else(|| "Invalid UTC offset".to_string()),
    };

    let digits = digits.replace(':', "");
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.as_str(), "0"),
        3 => digits.split_at(1),
        _ => digits.split_at(2),
    };
    let seconds = to_int::<i32>(hours, date_str)? * 3600 + to_int::<i32>(minutes, date_str)? * 60;
    FixedOffset::east_opt(sign * seconds)
        .ok_or_else(|| format!("Invalid offset in {}", date_str))
}

pub fn format_date_time(date_time: &DateTime<FixedOffset>) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// Turns a free-form tag into a single CamelCase token: `self-taught-dev` becomes `SelfTaughtDev`.
///
/// Every letter that starts a word is upper-cased and the rest of the word is kept as written,
/// so an already formatted tag comes back unchanged.
pub fn format_tag(tag: &str) -> String {
    let mut formatted = String::with_capacity(tag.len());
    let mut in_word = false;

    for c in tag.chars() {
        if c == '-' || c.is_whitespace() {
            in_word = false;
            continue;
        }

        if c.is_alphabetic() {
            if in_word {
                formatted.push(c);
            } else {
                formatted.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            formatted.push(c);
            in_word = false;
        }
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2017-09-10 10:42:32.123").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");
        assert_eq!(date_time.timestamp_subsec_millis(), 123);

        let date_time = parse_date_time("2017-09-10").unwrap();
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "00:00:00");

        let date_time = parse_date_time("2024-03-01T08:15:00+02:00").unwrap();
        let (_, time) = format_date_time(&date_time);
        assert_eq!(time, "08:15:00");
        assert_eq!(date_time.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_parse_date_time_spaced_offset() {
        let date_time = parse_date_time("2024-05-01 09:30:00 +02:00").unwrap();
        assert_eq!(format_date_time(&date_time).1, "09:30:00");
        assert_eq!(date_time.offset().local_minus_utc(), 2 * 3600);

        let date_time = parse_date_time("2024-05-01 09:30:00 -5").unwrap();
        assert_eq!(date_time.offset().local_minus_utc(), -5 * 3600);

        let date_time = parse_date_time("2024-05-01 09:30:00.5Z").unwrap();
        assert_eq!(date_time.offset().local_minus_utc(), 0);
        assert_eq!(date_time.timestamp_subsec_millis(), 500);

        assert!(parse_date_time("2024-05-01 +02:00").is_err());
    }

    #[test]
    fn test_parse_date_time_errors() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2017-13-40").is_err());
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag("self-taught-dev"), "SelfTaughtDev");
        assert_eq!(format_tag("machine learning"), "MachineLearning");
        assert_eq!(format_tag("rust"), "Rust");
        assert_eq!(format_tag("python3 tips"), "Python3Tips");
        assert_eq!(format_tag(""), "");
        assert_eq!(format_tag("  -- "), "");
    }

    #[test]
    fn test_format_tag_idempotent() {
        for tag in ["self-taught-dev", "GitHub actions", "c++", "über cool", "AI"] {
            let once = format_tag(tag);
            assert_eq!(format_tag(&once), once);
        }
    }
}

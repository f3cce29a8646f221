use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A single cell of a query result row.
///
/// Query results are exchanged as JSON, so cells keep the JSON representation: scalars,
/// nulls, and (for dynamic columns) either JSON-encoded strings or decoded arrays.
pub type CellValue = serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Interpret a cell as a number.
///
/// Decimal values are serialized as strings by the query engine, so numeric strings count.
pub fn as_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => n.as_f64(),
        CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// String form of a cell used when values are compared or grouped.
///
/// Nulls map to the empty string.
pub fn to_key_string(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a date/time string into epoch milliseconds (UTC)
pub fn parse_datetime_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}

/// Parse a timespan of the form `[-][d.]hh:mm:ss[.fffffff]` into signed milliseconds
pub fn parse_timespan_str(s: &str) -> Option<f64> {
    let s = s.trim();
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s),
    };

    let mut parts = body.split(':');
    let (head, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((d, h)) => (d.parse::<u64>().ok()?, h.parse::<u64>().ok()?),
        None => (0, head.parse::<u64>().ok()?),
    };
    let minutes = minutes.parse::<u64>().ok()?;
    let seconds = seconds.parse::<f64>().ok()?;
    if hours > 23 || minutes > 59 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let whole_seconds = days
        .checked_mul(86_400)?
        .checked_add(hours * 3_600 + minutes * 60)?;
    Some(sign * (whole_seconds as f64 + seconds) * 1_000.0)
}

/// Whether a cell holds a string that reads as a date/time
pub fn is_date_value(value: &CellValue) -> bool {
    match value {
        CellValue::String(s) => parse_datetime_str(s).is_some(),
        _ => false,
    }
}

/// Numeric timestamp of a date-like cell, in milliseconds.
///
/// Numbers are taken as epoch milliseconds, strings are tried as date/times and then as
/// timespans. Returns `None` for nulls and unparseable values.
pub fn parse_timestamp(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => n.as_f64(),
        CellValue::String(s) => parse_datetime_str(s).or_else(|| parse_timespan_str(s)),
        _ => None,
    }
}

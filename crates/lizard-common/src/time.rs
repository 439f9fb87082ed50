//! Time handling utilities.
//!
//! Time coordinates inside a [`crate::Dataset`] are stored as seconds since
//! 1970-01-01 UTC (fractional seconds allowed). The helpers here convert
//! between that representation, `chrono` types and CF-convention units.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Units attribute written for time coordinates.
pub const UNIX_TIME_UNITS: &str = "seconds since 1970-01-01 00:00:00";

/// A symmetric time window `center ± offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub center: DateTime<Utc>,
    pub offset: Duration,
}

impl TimeWindow {
    pub fn new(center: DateTime<Utc>, offset: Duration) -> Self {
        Self { center, offset }
    }

    /// Check if `t` lies within the window (edges included).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        (t - self.center).abs() <= self.offset
    }

    /// Same check on unix seconds.
    pub fn contains_unix(&self, seconds: f64) -> bool {
        let center = to_unix_seconds(self.center);
        let offset = self.offset.num_milliseconds() as f64 / 1000.0;
        (seconds - center).abs() <= offset
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.center - self.offset
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.center + self.offset
    }
}

/// Parse an ISO 8601 timestamp. Naive timestamps are taken as UTC.
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(start_of_day(date));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Midnight UTC of a date.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Convert a timestamp to unix seconds with millisecond resolution.
pub fn to_unix_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / 1000.0
}

/// Convert unix seconds back to a timestamp. NaN and out-of-range values
/// yield `None`.
pub fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

/// Parsed CF time units: `<unit> since <reference>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfTimeUnits {
    /// Length of one unit in seconds.
    pub scale: f64,
    pub reference: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Parse strings like "hours since 1900-01-01 00:00:00.0".
    pub fn parse(units: &str) -> Result<Self, TimeParseError> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;

        let scale = match unit.trim().to_lowercase().as_str() {
            "milliseconds" | "millisecond" | "ms" => 1e-3,
            "seconds" | "second" | "secs" | "s" => 1.0,
            "minutes" | "minute" | "mins" => 60.0,
            "hours" | "hour" | "h" => 3600.0,
            "days" | "day" | "d" => 86400.0,
            _ => return Err(TimeParseError::InvalidUnits(units.to_string())),
        };

        let reference = reference.trim().trim_end_matches(" UTC").trim_end_matches('Z');
        let reference = parse_iso8601(reference)
            .or_else(|_| parse_iso8601(&reference.replace(' ', "T")))
            .map_err(|_| TimeParseError::InvalidUnits(units.to_string()))?;

        Ok(Self { scale, reference })
    }

    /// Convert a value in these units to unix seconds.
    pub fn to_unix_seconds(&self, value: f64) -> f64 {
        to_unix_seconds(self.reference) + value * self.scale
    }
}

/// Check whether a units attribute describes a CF time axis.
pub fn is_cf_time_units(units: &str) -> bool {
    units.contains(" since ")
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid CF time units: {0}")]
    InvalidUnits(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601_variants() {
        let a = parse_iso8601("2019-05-31T10:00:00Z").unwrap();
        let b = parse_iso8601("2019-05-31T10:00:00").unwrap();
        let c = parse_iso8601("2019-05-31 10:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(
            parse_iso8601("2019-05-31").unwrap(),
            Utc.with_ymd_and_hms(2019, 5, 31, 0, 0, 0).unwrap()
        );
        assert!(parse_iso8601("yesterday").is_err());
    }

    #[test]
    fn test_time_window_edges_inclusive() {
        let center = Utc.with_ymd_and_hms(2015, 6, 10, 11, 0, 0).unwrap();
        let window = TimeWindow::new(center, Duration::minutes(50));
        assert!(window.contains(center + Duration::minutes(50)));
        assert!(window.contains(center - Duration::minutes(50)));
        assert!(!window.contains(center + Duration::minutes(51)));
        assert!(window.contains_unix(to_unix_seconds(center) - 3000.0));
        assert!(!window.contains_unix(to_unix_seconds(center) + 3000.5));
    }

    #[test]
    fn test_unix_seconds_roundtrip_keeps_milliseconds() {
        let t = Utc.with_ymd_and_hms(2022, 3, 20, 12, 30, 15).unwrap() + Duration::milliseconds(250);
        let s = to_unix_seconds(t);
        assert_eq!(from_unix_seconds(s), Some(t));
        assert_eq!(from_unix_seconds(f64::NAN), None);
    }

    #[test]
    fn test_cf_units() {
        let units = CfTimeUnits::parse("hours since 1900-01-01 00:00:00.0").unwrap();
        assert_eq!(units.scale, 3600.0);
        // 1970-01-01 is 613608 hours after 1900-01-01
        assert_eq!(units.to_unix_seconds(613608.0), 0.0);

        let units = CfTimeUnits::parse("seconds since 2022-03-20").unwrap();
        assert_eq!(
            from_unix_seconds(units.to_unix_seconds(60.0)),
            Some(Utc.with_ymd_and_hms(2022, 3, 20, 0, 1, 0).unwrap())
        );
        assert!(CfTimeUnits::parse("furlongs since 2000-01-01").is_err());
        assert!(!is_cf_time_units("K"));
    }
}

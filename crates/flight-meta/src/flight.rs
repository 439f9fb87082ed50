//! Flight and segment records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use lizard_common::time::to_unix_seconds;
use serde::{Deserialize, Serialize};

use crate::error::FlightError;

/// Segment kinds that describe vertical profiles or profile patterns.
pub const PROFILE_KINDS: [&str; 13] = [
    "major_ascent",
    "major_descent",
    "small_ascent",
    "small_descent",
    "medium_ascent",
    "medium_descent",
    "large_ascent",
    "large_descent",
    "sawtooth_pattern",
    "racetrack_pattern",
    "stairstep_pattern",
    "ascent",
    "descent",
];

/// Composite flight key `MISSION_PLATFORM_NAME`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightId {
    pub mission: String,
    pub platform: String,
    pub name: String,
}

impl FlightId {
    /// Flight id of a segment id such as `ACLOUD_P5_RF04_hl01`.
    pub fn of_segment(segment_id: &str) -> Result<Self, FlightError> {
        let parts: Vec<&str> = segment_id.split('_').collect();
        if parts.len() < 3 {
            return Err(FlightError::InvalidFlightId(segment_id.to_string()));
        }
        parts[..3].join("_").parse()
    }
}

impl FromStr for FlightId {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        match parts.as_slice() {
            [mission, platform, name]
                if !mission.is_empty() && !platform.is_empty() && !name.is_empty() =>
            {
                Ok(Self {
                    mission: mission.to_string(),
                    platform: platform.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(FlightError::InvalidFlightId(s.to_string())),
        }
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.mission, self.platform, self.name)
    }
}

/// A named time interval of a flight, possibly split into parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub segment_id: Option<String>,
    #[serde(default)]
    pub kinds: Vec<String>,
    #[serde(with = "timestamp")]
    pub start: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Segment>>,
}

impl Segment {
    /// Whether any of the segment's kinds is in `kinds`.
    pub fn has_any_kind<S: AsRef<str>>(&self, kinds: &[S]) -> bool {
        self.kinds
            .iter()
            .any(|k| kinds.iter().any(|other| other.as_ref() == k))
    }

    /// Start and end as unix seconds.
    pub fn unix_bounds(&self) -> (f64, f64) {
        (to_unix_seconds(self.start), to_unix_seconds(self.end))
    }

    /// Indices of `times` (unix seconds) inside the segment, edges included.
    pub fn indices(&self, times: &[f64]) -> Vec<usize> {
        let (start, end) = self.unix_bounds();
        times
            .iter()
            .enumerate()
            .filter(|(_, t)| **t >= start && **t <= end)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Metadata of one research flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub mission: String,
    pub platform: String,
    pub flight_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "timestamp")]
    pub takeoff: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub landing: DateTime<Utc>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Flight {
    /// Segments with parts replaced by the parts themselves.
    pub fn segments_plain(&self) -> Vec<&Segment> {
        let mut out = Vec::new();
        for segment in &self.segments {
            match &segment.parts {
                Some(parts) => out.extend(parts.iter()),
                None => out.push(segment),
            }
        }
        out
    }

    /// Segments and parts keyed by segment id. Entries without an id are
    /// skipped, as are segments that have parts.
    pub fn segments_dict(&self) -> BTreeMap<String, &Segment> {
        self.segments_plain()
            .into_iter()
            .filter_map(|s| s.segment_id.clone().map(|id| (id, s)))
            .collect()
    }

    /// Profile segments (ascents, descents and patterns). A matching
    /// segment with parts contributes its matching parts instead. Sorted
    /// by segment id.
    pub fn profiles(&self) -> Vec<&Segment> {
        let mut out: Vec<&Segment> = Vec::new();
        for segment in &self.segments {
            if !segment.has_any_kind(&PROFILE_KINDS) {
                continue;
            }
            match &segment.parts {
                Some(parts) if !parts.is_empty() => out.extend(
                    parts
                        .iter()
                        .filter(|p| p.has_any_kind(&PROFILE_KINDS)),
                ),
                _ => out.push(segment),
            }
        }
        out.sort_by(|a, b| a.segment_id.cmp(&b.segment_id));
        out
    }

    /// One line per top-level segment: `index : name segment_id kinds`.
    pub fn segment_listing(&self) -> Vec<String> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "{} : {} {} [{}]",
                    i,
                    s.name.as_deref().unwrap_or("None"),
                    s.segment_id.as_deref().unwrap_or("None"),
                    s.kinds.join(", ")
                )
            })
            .collect()
    }
}

/// Timestamps in the segment files are written as `YYYY-MM-DD HH:MM:SS`
/// and are UTC.
mod timestamp {
    use chrono::{DateTime, Utc};
    use lizard_common::time::parse_iso8601;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_iso8601(raw.trim()).map_err(serde::de::Error::custom)
    }
}

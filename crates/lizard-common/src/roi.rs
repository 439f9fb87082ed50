//! Rectangular longitude/latitude regions of interest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A longitude/latitude box given as `[lon0, lon1, lat0, lat1]` in degrees.
///
/// Containment is half-open: the lower edges belong to the region, the upper
/// edges do not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub lon0: f64,
    pub lon1: f64,
    pub lat0: f64,
    pub lat1: f64,
}

impl RegionOfInterest {
    pub fn new(lon0: f64, lon1: f64, lat0: f64, lat1: f64) -> Self {
        Self {
            lon0,
            lon1,
            lat0,
            lat1,
        }
    }

    /// The whole globe. Points on the 180°E meridian and the North Pole are
    /// outside because of the half-open upper edges.
    pub fn globe() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    /// Check if a point lies within the region.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon0 && lon < self.lon1 && lat >= self.lat0 && lat < self.lat1
    }

    /// Region as the `[lon0, lon1, lat0, lat1]` array.
    pub fn as_array(&self) -> [f64; 4] {
        [self.lon0, self.lon1, self.lat0, self.lat1]
    }
}

impl From<[f64; 4]> for RegionOfInterest {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl FromStr for RegionOfInterest {
    type Err = RoiParseError;

    /// Parse "lon0,lon1,lat0,lat1".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(RoiParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| RoiParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::from(values))
    }
}

impl fmt::Display for RegionOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.lon0, self.lon1, self.lat0, self.lat1)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoiParseError {
    #[error("Invalid ROI format: {0}. Expected 'lon0,lon1,lat0,lat1'")]
    InvalidFormat(String),

    #[error("Invalid number in ROI: {0}")]
    InvalidNumber(String),
}

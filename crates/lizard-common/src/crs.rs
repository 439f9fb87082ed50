//! Coordinate Reference System codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRS codes used when projecting footprints and flight tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// NSIDC Sea Ice Polar Stereographic North (meters)
    Epsg3413,
    /// WGS84 / UTM zone, northern or southern hemisphere (meters)
    Utm { zone: u8, north: bool },
}

impl CrsCode {
    /// Parse a CRS string.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:3413"
    /// - "EPSG:32633" (UTM 33N) or "EPSG:32733" (UTM 33S)
    pub fn from_epsg_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();
        let code = normalized
            .strip_prefix("EPSG:")
            .ok_or_else(|| CrsParseError::InvalidFormat(s.to_string()))?
            .parse::<u32>()
            .map_err(|_| CrsParseError::InvalidFormat(s.to_string()))?;
        Self::from_epsg(code)
    }

    /// Resolve a numeric EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, CrsParseError> {
        match code {
            4326 => Ok(CrsCode::Epsg4326),
            3413 => Ok(CrsCode::Epsg3413),
            32601..=32660 => Ok(CrsCode::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(CrsCode::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(CrsParseError::UnsupportedCrs(code.to_string())),
        }
    }

    /// Northern hemisphere UTM zone.
    pub fn utm_north(zone: u8) -> Result<Self, CrsParseError> {
        if !(1..=60).contains(&zone) {
            return Err(CrsParseError::InvalidUtmZone(zone));
        }
        Ok(CrsCode::Utm { zone, north: true })
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3413 => 3413,
            CrsCode::Utm { zone, north: true } => 32600 + *zone as u32,
            CrsCode::Utm { zone, north: false } => 32700 + *zone as u32,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Invalid CRS format: {0}. Expected 'EPSG:<code>'")]
    InvalidFormat(String),

    #[error("Unsupported CRS: EPSG:{0}")]
    UnsupportedCrs(String),

    #[error("Invalid UTM zone: {0}")]
    InvalidUtmZone(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(
            CrsCode::from_epsg_string("epsg:3413").unwrap(),
            CrsCode::Epsg3413
        );
        assert_eq!(
            CrsCode::from_epsg_string("EPSG:32633").unwrap(),
            CrsCode::Utm {
                zone: 33,
                north: true
            }
        );
        assert!(CrsCode::from_epsg_string("EPSG:3857").is_err());
        assert!(CrsCode::from_epsg_string("3413").is_err());
    }

    #[test]
    fn test_display_roundtrips_epsg() {
        let crs = CrsCode::utm_north(31).unwrap();
        assert_eq!(crs.to_string(), "EPSG:32631");
        assert!(CrsCode::utm_north(61).is_err());
    }
}

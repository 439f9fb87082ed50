//! Distances between geographic points.

use lizard_common::CrsCode;

use crate::error::{ProjectionError, ProjectionResult};
use crate::transform::Projector;

/// Mean Earth radius used for great-circle distances (km).
pub const EARTH_RADIUS_KM: f64 = 6367.0;

/// Projected coordinate system for [`distance_along_track`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackCrs {
    /// Northern hemisphere UTM zone
    Utm(u8),
    /// Any supported EPSG code
    Epsg(u32),
}

impl TrackCrs {
    /// Resolve from the two mutually exclusive options.
    pub fn from_options(utm: Option<u8>, epsg: Option<u32>) -> ProjectionResult<Self> {
        match (utm, epsg) {
            (Some(_), Some(_)) => Err(ProjectionError::AmbiguousCrs),
            (Some(zone), None) => Ok(TrackCrs::Utm(zone)),
            (None, Some(code)) => Ok(TrackCrs::Epsg(code)),
            (None, None) => Ok(TrackCrs::Utm(32)),
        }
    }

    fn crs(&self) -> ProjectionResult<CrsCode> {
        Ok(match self {
            TrackCrs::Utm(zone) => CrsCode::utm_north(*zone)?,
            TrackCrs::Epsg(code) => CrsCode::from_epsg(*code)?,
        })
    }
}

/// Signed distance of points along the straight line from `p0` to `p1`.
///
/// All points are projected into `crs`; each point's offset from `p0` is
/// projected onto the unit vector pointing from `p0` to `p1`. Values are
/// positive towards `p1` and negative behind `p0`, in projected meters.
///
/// # Arguments
/// * `lon`, `lat` - Points to measure (degrees)
/// * `p0` - Track origin as (lon, lat)
/// * `p1` - Track end as (lon, lat)
pub fn distance_along_track(
    lon: &[f64],
    lat: &[f64],
    p0: (f64, f64),
    p1: (f64, f64),
    crs: TrackCrs,
) -> ProjectionResult<Vec<f64>> {
    if lon.len() != lat.len() {
        return Err(ProjectionError::LengthMismatch(lon.len(), lat.len()));
    }

    let proj = Projector::from_crs(crs.crs()?)?;
    let (x0, y0) = proj.forward(p0.0, p0.1);
    let (x1, y1) = proj.forward(p1.0, p1.1);

    let norm = (x1 - x0).hypot(y1 - y0);
    if norm == 0.0 {
        return Err(ProjectionError::DegenerateTrack);
    }
    let (ex, ey) = ((x1 - x0) / norm, (y1 - y0) / norm);

    Ok(lon
        .iter()
        .zip(lat)
        .map(|(&lon, &lat)| {
            let (x, y) = proj.forward(lon, lat);
            (x - x0) * ex + (y - y0) * ey
        })
        .collect())
}

/// Great-circle distance between two points (km).
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = phi2 - phi1;
    let dlam = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

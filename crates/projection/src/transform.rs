//! Dispatch from CRS codes to concrete projections.

use lizard_common::CrsCode;

use crate::error::ProjectionResult;
use crate::polar::PolarStereographic;
use crate::utm::TransverseMercator;

/// A resolved map projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projector {
    /// Identity on longitude/latitude (degrees)
    Geographic,
    PolarStereographic(PolarStereographic),
    TransverseMercator(TransverseMercator),
}

impl Projector {
    pub fn from_crs(crs: CrsCode) -> ProjectionResult<Self> {
        Ok(match crs {
            CrsCode::Epsg4326 => Projector::Geographic,
            CrsCode::Epsg3413 => Projector::PolarStereographic(PolarStereographic::epsg3413()),
            CrsCode::Utm { zone, north } => {
                Projector::TransverseMercator(TransverseMercator::utm(zone, north)?)
            }
        })
    }

    /// Project one point given in degrees.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projector::Geographic => (lon, lat),
            Projector::PolarStereographic(p) => p.forward(lon, lat),
            Projector::TransverseMercator(p) => p.forward(lon, lat),
        }
    }

    /// Project many points. Slices must have equal length.
    pub fn forward_many(&self, lon: &[f64], lat: &[f64]) -> (Vec<f64>, Vec<f64>) {
        lon.iter()
            .zip(lat)
            .map(|(&lon, &lat)| self.forward(lon, lat))
            .unzip()
    }
}

/// Project a single lon/lat point into a CRS.
pub fn project(crs: CrsCode, lon: f64, lat: f64) -> ProjectionResult<(f64, f64)> {
    Ok(Projector::from_crs(crs)?.forward(lon, lat))
}

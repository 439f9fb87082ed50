//! North polar stereographic projection on the ellipsoid.
//!
//! Used for all Arctic distance computations. Two parameterisations are
//! supported:
//! - a standard parallel (`lat_ts`) with true scale, as in EPSG:3413
//!   (NSIDC Sea Ice Polar Stereographic North, lat_ts = 70°N, lon_0 = -45°)
//! - true scale at the pole (`lat_ts` = 90°), the common map default
//!
//! Formulas follow Snyder (1987), Map Projections: A Working Manual, §21.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use crate::ellipsoid::Ellipsoid;

/// North polar stereographic projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarStereographic {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of true scale in radians
    pub lat_ts: f64,
    pub ellipsoid: Ellipsoid,
    /// Radius scale so that rho = scale * t
    scale: f64,
}

impl PolarStereographic {
    /// Create a projection from degrees.
    ///
    /// # Arguments
    /// * `lon0_deg` - Straight vertical longitude from pole (degrees)
    /// * `lat_ts_deg` - Latitude of true scale (degrees, northern hemisphere)
    pub fn new(lon0_deg: f64, lat_ts_deg: f64, ellipsoid: Ellipsoid) -> Self {
        let lon0 = lon0_deg.to_radians();
        let lat_ts = lat_ts_deg.to_radians();
        let a = ellipsoid.a;
        let e = ellipsoid.e();

        let scale = if (lat_ts - FRAC_PI_2).abs() < 1e-10 {
            2.0 * a / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
        } else {
            a * m_func(lat_ts, e) / t_func(lat_ts, e)
        };

        Self {
            lon0,
            lat_ts,
            ellipsoid,
            scale,
        }
    }

    /// EPSG:3413 on WGS84.
    pub fn epsg3413() -> Self {
        Self::new(-45.0, 70.0, Ellipsoid::WGS84)
    }

    /// Pole-tangent projection centred on the Greenwich meridian.
    pub fn north_pole_tangent() -> Self {
        Self::new(0.0, 90.0, Ellipsoid::WGS84)
    }

    /// Project geographic coordinates (degrees) to map coordinates (meters).
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let dlam = lon.to_radians() - self.lon0;
        let rho = self.scale * t_func(phi, self.ellipsoid.e());
        (rho * dlam.sin(), -rho * dlam.cos())
    }

    /// Map coordinates (meters) back to geographic coordinates (degrees).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        if rho == 0.0 {
            return (self.lon0.to_degrees(), 90.0);
        }

        let e2 = self.ellipsoid.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e4 * e4;

        let t = rho / self.scale;
        let chi = FRAC_PI_2 - 2.0 * t.atan();
        let phi = chi
            + (e2 / 2.0 + 5.0 * e4 / 24.0 + e6 / 12.0 + 13.0 * e8 / 360.0) * (2.0 * chi).sin()
            + (7.0 * e4 / 48.0 + 29.0 * e6 / 240.0 + 811.0 * e8 / 11520.0) * (4.0 * chi).sin()
            + (7.0 * e6 / 120.0 + 81.0 * e8 / 1120.0) * (6.0 * chi).sin()
            + (4279.0 * e8 / 161280.0) * (8.0 * chi).sin();

        let lam = self.lon0 + x.atan2(-y);
        (normalize_lon(lam.to_degrees()), phi.to_degrees())
    }
}

fn t_func(phi: f64, e: f64) -> f64 {
    let s = phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - e * s) / (1.0 + e * s)).powf(e / 2.0)
}

fn m_func(phi: f64, e: f64) -> f64 {
    let s = phi.sin();
    phi.cos() / (1.0 - e * e * s * s).sqrt()
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

//! Transverse Mercator projection (UTM).
//!
//! Forward mapping via the Krüger series to third order in the third
//! flattening, accurate to well below a millimetre within a UTM zone.
//! Reference: Karney (2011), Transverse Mercator with an accuracy of a few
//! nanometers, J. Geodesy 85.

use crate::ellipsoid::Ellipsoid;
use crate::error::{ProjectionError, ProjectionResult};

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    /// Rectifying radius
    big_a: f64,
    alpha: [f64; 3],
}

impl TransverseMercator {
    pub fn new(
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let f = ellipsoid.f;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;

        let big_a = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
            61.0 * n3 / 240.0,
        ];

        Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            ellipsoid,
            big_a,
            alpha,
        }
    }

    /// WGS84 UTM zone.
    pub fn utm(zone: u8, north: bool) -> ProjectionResult<Self> {
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError::Unsupported(format!("UTM zone {}", zone)));
        }
        let lon0 = zone as f64 * 6.0 - 183.0;
        let false_northing = if north { 0.0 } else { 10_000_000.0 };
        Ok(Self::new(lon0, 0.9996, 500_000.0, false_northing, Ellipsoid::WGS84))
    }

    /// Project geographic coordinates (degrees) to easting/northing (meters).
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let e = self.ellipsoid.e();
        let phi = lat.to_radians();
        let dlam = lon.to_radians() - self.lon0;

        let t = (phi.sin().atanh() - e * (e * phi.sin()).atanh()).sinh();
        let xi = t.atan2(dlam.cos());
        let eta = (dlam.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut easting = eta;
        let mut northing = xi;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            easting += alpha * (k * xi).cos() * (k * eta).sinh();
            northing += alpha * (k * xi).sin() * (k * eta).cosh();
        }

        (
            self.false_easting + self.k0 * self.big_a * easting,
            self.false_northing + self.k0 * self.big_a * northing,
        )
    }
}

/// UTM zone number containing a longitude.
pub fn utm_zone(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i64 % 60 + 1;
    zone.clamp(1, 60) as u8
}

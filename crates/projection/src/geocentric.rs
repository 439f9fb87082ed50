//! Geodetic <-> Earth-centred Earth-fixed (ECEF) coordinates.

use nalgebra::Vector3;

use crate::ellipsoid::Ellipsoid;

/// Geodetic longitude/latitude (degrees) and height (meters) to ECEF (meters).
pub fn to_ecef(lon: f64, lat: f64, height: f64, ellipsoid: &Ellipsoid) -> Vector3<f64> {
    let phi = lat.to_radians();
    let lam = lon.to_radians();
    let e2 = ellipsoid.e2();
    let n = ellipsoid.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();

    Vector3::new(
        (n + height) * phi.cos() * lam.cos(),
        (n + height) * phi.cos() * lam.sin(),
        (n * (1.0 - e2) + height) * phi.sin(),
    )
}

/// ECEF (meters) to geodetic longitude, latitude (degrees) and height (meters).
///
/// Uses Bowring's method with a few fixed-point refinements, which converges
/// to sub-millimetre accuracy for points near the surface and inside the
/// Earth alike.
pub fn from_ecef(p: &Vector3<f64>, ellipsoid: &Ellipsoid) -> (f64, f64, f64) {
    let a = ellipsoid.a;
    let b = ellipsoid.b();
    let e2 = ellipsoid.e2();
    let ep2 = (a * a - b * b) / (b * b);

    let lon = p.y.atan2(p.x);
    let r = p.x.hypot(p.y);

    if r < 1e-9 {
        let lat = if p.z >= 0.0 { 90.0 } else { -90.0 };
        return (lon.to_degrees(), lat, p.z.abs() - b);
    }

    let mut beta = (a * p.z).atan2(b * r);
    let mut phi = 0.0;
    for _ in 0..5 {
        phi = (p.z + ep2 * b * beta.sin().powi(3)).atan2(r - e2 * a * beta.cos().powi(3));
        beta = ((1.0 - ellipsoid.f) * phi.tan()).atan();
    }

    let n = a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
    let height = r / phi.cos() - n;

    (lon.to_degrees(), phi.to_degrees(), height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_equator_prime_meridian() {
        let p = to_ecef(0.0, 0.0, 0.0, &Ellipsoid::WGS84);
        assert_approx_eq!(p.x, 6378137.0, 1e-6);
        assert_approx_eq!(p.y, 0.0, 1e-6);
        assert_approx_eq!(p.z, 0.0, 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let wgs = Ellipsoid::WGS84;
        for (lon, lat, h) in [(11.93, 78.92, 0.0), (-45.0, 70.0, 833_000.0), (120.0, -33.0, -500.0)] {
            let p = to_ecef(lon, lat, h, &wgs);
            let (lon2, lat2, h2) = from_ecef(&p, &wgs);
            assert_approx_eq!(lon2, lon, 1e-9);
            assert_approx_eq!(lat2, lat, 1e-9);
            assert_approx_eq!(h2, h, 1e-3);
        }
    }
}

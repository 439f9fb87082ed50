//! Along-track distance behaviour in projected coordinates.

use projection::distance::{distance_along_track, TrackCrs};
use projection::polar::PolarStereographic;
use test_utils::assert_approx_eq;

#[test]
fn test_endpoints_map_to_zero_and_track_length() {
    let p0 = (11.0, 78.5);
    let p1 = (12.0, 79.0);
    let crs = TrackCrs::Epsg(3413);

    let d = distance_along_track(&[p0.0, p1.0], &[p0.1, p1.1], p0, p1, crs).unwrap();

    let proj = PolarStereographic::epsg3413();
    let (x0, y0) = proj.forward(p0.0, p0.1);
    let (x1, y1) = proj.forward(p1.0, p1.1);
    let length = (x1 - x0).hypot(y1 - y0);

    assert_approx_eq!(d[0], 0.0, 1e-6);
    assert_approx_eq!(d[1], length, 1e-6);
}

#[test]
fn test_points_behind_origin_are_negative() {
    let p0 = (15.0, 78.0);
    let p1 = (15.0, 79.0);
    let d = distance_along_track(&[15.0, 15.0], &[77.5, 78.5], p0, p1, TrackCrs::Utm(33)).unwrap();
    assert!(d[0] < 0.0);
    assert!(d[1] > 0.0);
    // half a degree of latitude is roughly 55.7 km
    assert_approx_eq!(d[1], 55_700.0, 600.0);
}

#[test]
fn test_rejects_degenerate_track() {
    let p = (15.0, 78.0);
    assert!(distance_along_track(&[15.0], &[78.0], p, p, TrackCrs::Utm(33)).is_err());
    assert!(distance_along_track(&[15.0], &[], (15.0, 78.0), (15.0, 79.0), TrackCrs::Utm(33)).is_err());
}

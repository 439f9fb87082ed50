//! Along-track scan selection.
//!
//! Every predicate works on the footprints of whole scans: a scan is kept
//! when ANY of its footprints satisfies it, so scans that only partly
//! overlap a region are kept in full.

use lizard_common::{RegionOfInterest, TimeWindow};
use ndarray::{ArrayView2, Axis, Zip};
use projection::PolarStereographic;

/// Spatial selection of scans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialFilter {
    /// Footprints inside a lon/lat box
    Roi(RegionOfInterest),
    /// Footprints within `max_distance` meters of a center point, measured
    /// in the EPSG:3413 plane
    Distance {
        center_lat: f64,
        center_lon: f64,
        max_distance: f64,
    },
}

impl SpatialFilter {
    pub fn distance(center_lat: f64, center_lon: f64, max_distance: f64) -> Self {
        SpatialFilter::Distance {
            center_lat,
            center_lon,
            max_distance,
        }
    }

    /// Scan mask for footprint coordinates of shape (scan, pixel).
    pub fn scan_mask(&self, lat: ArrayView2<'_, f64>, lon: ArrayView2<'_, f64>) -> Vec<bool> {
        match *self {
            SpatialFilter::Roi(roi) => roi_index(lat, lon, &roi),
            SpatialFilter::Distance {
                center_lat,
                center_lon,
                max_distance,
            } => distance_index(lat, lon, center_lat, center_lon, max_distance),
        }
    }
}

/// Scans with at least one footprint inside the half-open region
/// `[lon0, lon1) x [lat0, lat1)`.
pub fn roi_index(
    lat: ArrayView2<'_, f64>,
    lon: ArrayView2<'_, f64>,
    roi: &RegionOfInterest,
) -> Vec<bool> {
    scan_any(lat, lon, |la, lo| roi.contains(lo, la))
}

/// Scans with at least one footprint within `max_distance` meters of the
/// center. Distances are Euclidean in north polar stereographic
/// coordinates (EPSG:3413), an approximation of the geodesic distance.
pub fn distance_index(
    lat: ArrayView2<'_, f64>,
    lon: ArrayView2<'_, f64>,
    center_lat: f64,
    center_lon: f64,
    max_distance: f64,
) -> Vec<bool> {
    let proj = PolarStereographic::epsg3413();
    let (cx, cy) = proj.forward(center_lon, center_lat);
    scan_any(lat, lon, |la, lo| {
        let (x, y) = proj.forward(lo, la);
        (x - cx).hypot(y - cy) <= max_distance
    })
}

/// Scans whose time (unix seconds) lies within the window.
pub fn time_index(scan_time: &[f64], window: &TimeWindow) -> Vec<bool> {
    scan_time.iter().map(|t| window.contains_unix(*t)).collect()
}

/// Indices of the set entries of a mask.
pub fn mask_to_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(i, _)| i)
        .collect()
}

fn scan_any(
    lat: ArrayView2<'_, f64>,
    lon: ArrayView2<'_, f64>,
    predicate: impl Fn(f64, f64) -> bool,
) -> Vec<bool> {
    lat.axis_iter(Axis(0))
        .zip(lon.axis_iter(Axis(0)))
        .map(|(lat_scan, lon_scan)| {
            let mut hit = false;
            Zip::from(&lat_scan).and(&lon_scan).for_each(|la, lo| {
                hit |= predicate(*la, *lo);
            });
            hit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use lizard_common::time::to_unix_seconds;
    use ndarray::Array2;
    use test_utils::create_swath_geolocation;

    fn swath() -> (Array2<f64>, Array2<f64>) {
        // 10 scans from 80N to 84.5N, 5 pixels from 0E to 20E
        let (lat, lon) = create_swath_geolocation(10, 5, 80.0, 0.5, 0.0, 5.0);
        (
            Array2::from_shape_vec((10, 5), lat).unwrap(),
            Array2::from_shape_vec((10, 5), lon).unwrap(),
        )
    }

    #[test]
    fn test_roi_index_any_footprint() {
        let (lat, lon) = swath();
        // only the last pixel (20E) is inside, still keeps the scan
        let roi = RegionOfInterest::new(19.0, 30.0, 81.0, 82.0);
        let ix = roi_index(lat.view(), lon.view(), &roi);
        assert_eq!(mask_to_indices(&ix), vec![2, 3]);
    }

    #[test]
    fn test_roi_upper_bounds_are_exclusive() {
        let (lat, lon) = swath();
        let roi = RegionOfInterest::new(-10.0, 0.0, 80.0, 85.0);
        assert!(roi_index(lat.view(), lon.view(), &roi).iter().all(|k| !k));
    }

    #[test]
    fn test_distance_index() {
        let (lat, lon) = swath();
        // 0.5 degree of latitude is ~55.6 km; 60 km reaches one scan on each side
        let ix = distance_index(lat.view(), lon.view(), 82.0, 0.0, 60_000.0);
        assert_eq!(mask_to_indices(&ix), vec![3, 4, 5]);

        let filter = SpatialFilter::distance(82.0, 0.0, 1_000.0);
        assert_eq!(mask_to_indices(&filter.scan_mask(lat.view(), lon.view())), vec![4]);
    }

    #[test]
    fn test_time_index_edges() {
        let center = Utc.with_ymd_and_hms(2015, 6, 10, 11, 0, 0).unwrap();
        let window = TimeWindow::new(center, Duration::minutes(50));
        let t0 = to_unix_seconds(center);
        let times = [t0 - 3001.0, t0 - 3000.0, t0, t0 + 3000.0, t0 + 3000.5];
        assert_eq!(
            time_index(&times, &window),
            vec![false, true, true, true, false]
        );
    }
}

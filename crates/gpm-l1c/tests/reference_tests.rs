//! Regression checks against archived granules.
//!
//! Point `TEST_DATA_DIR` at a directory containing `sat/gpm_l1c/` to run
//! them; they are skipped otherwise.

use chrono::{Duration, TimeZone, Utc};
use gpm_l1c::{GpmL1c, Instrument, ReadOptions, SpatialFilter, TimeFilter};
use lizard_common::{RegionOfInterest, TimeWindow};
use test_utils::{granules, require_test_file, roi};

#[test]
fn test_atms_whole_globe() {
    let dir = require_test_file!("sat/gpm_l1c");
    let gpm = GpmL1c::new(dir);

    let options =
        ReadOptions::with_filter(SpatialFilter::Roi(RegionOfInterest::from(roi::GLOBE)));
    let ds = gpm
        .read(Instrument::Atms, "SNPP", granules::ATMS_SNPP_GLOBE, &options)
        .unwrap();
    assert_eq!(ds.dim_len("x"), Some(2258));
    assert_eq!(ds.dim_len("y"), Some(96));
    assert_eq!(ds.dim_len("channel"), Some(7));
}

#[test]
fn test_atms_near_pole() {
    let dir = require_test_file!("sat/gpm_l1c");
    let gpm = GpmL1c::new(dir);

    let options = ReadOptions::with_filter(SpatialFilter::distance(85.0, 45.0, 200_000.0));
    let ds = gpm
        .read(Instrument::Atms, "SNPP", granules::ATMS_SNPP_NEAR_POLE, &options)
        .unwrap();
    assert_eq!(ds.dim_len("x"), Some(24));
    assert_eq!(ds.dim_len("y"), Some(96));
    assert_eq!(ds.dim_len("channel"), Some(7));
}

#[test]
fn test_mhs_overpass_search() {
    let dir = require_test_file!("sat/gpm_l1c");
    let gpm = GpmL1c::new(dir);

    let center = Utc.with_ymd_and_hms(2015, 6, 10, 11, 0, 0).unwrap();
    let window = TimeFilter::Window(TimeWindow::new(center, Duration::minutes(50)));
    let found = gpm
        .in_roi(
            Instrument::Mhs,
            "NOAA-18",
            &window,
            &SpatialFilter::distance(82.0, 0.0, 200_000.0),
        )
        .unwrap();
    assert_eq!(found, vec![granules::MHS_NOAA18]);
}

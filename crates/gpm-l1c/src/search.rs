//! Finding granules by time and location.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use lizard_common::TimeWindow;
use netcdf_io::NcReader;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::GpmResult;
use crate::filename::{list_granule_files, GranuleFile};
use crate::index::{time_index, SpatialFilter};
use crate::instrument::{filename_sat, Instrument};
use crate::swath::{read_geolocation, read_scan_time};

/// Temporal pre-selection of granule files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeFilter {
    /// Orbits starting on this date
    Date(NaiveDate),
    /// Orbits whose start lies within the window or whose end lies strictly
    /// within it. Scans are additionally checked against the window by
    /// [`in_roi`].
    Window(TimeWindow),
}

impl TimeFilter {
    fn accepts(&self, file: &GranuleFile) -> bool {
        match self {
            TimeFilter::Date(date) => file.date == *date,
            TimeFilter::Window(window) => {
                (file.start - window.center).abs() <= window.offset
                    || (file.end - window.center).abs() < window.offset
            }
        }
    }
}

/// Granule files of one instrument and satellite that pass the time filter,
/// sorted by file name.
pub fn get_files(
    dir: &Path,
    instrument: Instrument,
    satellite: &str,
    time: &TimeFilter,
) -> GpmResult<Vec<GranuleFile>> {
    let prefix = filename_sat(instrument, satellite)?;
    let files: Vec<GranuleFile> = list_granule_files(dir, prefix)?
        .into_iter()
        .filter(|f| time.accepts(f))
        .collect();

    debug!(
        dir = %dir.display(),
        instrument = %instrument,
        satellite,
        n_files = files.len(),
        "Selected granule files"
    );
    Ok(files)
}

/// Granules that lie at least partly inside the spatial filter.
///
/// The footprints of the instrument's first W/G-band swath are checked.
/// With a [`TimeFilter::Window`] only scans inside the window count, which
/// also finds orbits of the neighbouring day around midnight.
pub fn in_roi(
    dir: &Path,
    instrument: Instrument,
    satellite: &str,
    time: &TimeFilter,
    spatial: &SpatialFilter,
) -> GpmResult<Vec<String>> {
    let files = get_files(dir, instrument, satellite, time)?;
    let swath = instrument.wg_swaths()[0];

    let hits: Vec<Option<String>> = files
        .par_iter()
        .map(|file| -> GpmResult<Option<String>> {
            let reader = NcReader::open(&file.path)?;
            let (lat, lon) = read_geolocation(&reader, swath)?;
            let mut mask = spatial.scan_mask(lat.view(), lon.view());

            if let TimeFilter::Window(window) = time {
                let scan_time = read_scan_time(&reader, swath)?;
                for (keep, in_time) in mask.iter_mut().zip(time_index(&scan_time, window)) {
                    *keep &= in_time;
                }
            }

            Ok(mask.iter().any(|m| *m).then(|| file.granule.clone()))
        })
        .collect::<GpmResult<_>>()?;

    let granules: Vec<String> = hits.into_iter().flatten().collect();
    info!(
        instrument = %instrument,
        satellite,
        checked = files.len(),
        found = granules.len(),
        "Searched granules"
    );
    Ok(granules)
}

/// [`in_roi`] for several `(satellite, instrument)` pairs, keyed by
/// `"{satellite}_{instrument}"`.
pub fn get_granules(
    dir: &Path,
    sat_ins: &[(&str, Instrument)],
    time: &TimeFilter,
    spatial: &SpatialFilter,
) -> GpmResult<BTreeMap<String, Vec<String>>> {
    let mut out = BTreeMap::new();
    for (satellite, instrument) in sat_ins {
        let granules = in_roi(dir, *instrument, satellite, time, spatial)?;
        out.insert(format!("{}_{}", satellite, instrument), granules);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn file(name: &str) -> GranuleFile {
        GranuleFile::parse(name).unwrap()
    }

    #[test]
    fn test_date_filter_uses_orbit_start_date() {
        let f = file("1C.NOAA18.MHS.XCAL2016-V.20150609-S232000-E011500.051811.V07A.HDF5");
        let date = NaiveDate::from_ymd_opt(2015, 6, 9).unwrap();
        assert!(TimeFilter::Date(date).accepts(&f));
        assert!(!TimeFilter::Date(date.succ_opt().unwrap()).accepts(&f));
    }

    #[test]
    fn test_window_filter_around_midnight() {
        let f = file("1C.NOAA18.MHS.XCAL2016-V.20150609-S232000-E011500.051811.V07A.HDF5");
        let center = Utc.with_ymd_and_hms(2015, 6, 10, 1, 0, 0).unwrap();

        // end time rolled over to the next day lies within the window
        let window = TimeWindow::new(center, Duration::minutes(30));
        assert!(TimeFilter::Window(window).accepts(&f));

        // end exactly on the edge is excluded, start on the edge included
        let window = TimeWindow::new(center, Duration::minutes(15));
        assert!(!TimeFilter::Window(window).accepts(&f));
        let window = TimeWindow::new(center, Duration::minutes(100));
        assert!(TimeFilter::Window(window).accepts(&f));
    }
}

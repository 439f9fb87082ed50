//! GPM L1C V07 brightness temperature swaths.
//!
//! Reads the intercalibrated (XCAL) L1C granules of the conically and
//! cross-track scanning radiometers (MHS, ATMS, SSMIS, AMSR2) into
//! [`lizard_common::Dataset`]s with dimensions `x` (scan), `y` (pixel) and
//! `channel`, optionally keeping only scans near a point or inside a
//! region, and finds the granules that overpass a region in a time window.
//!
//! Granules live in `$PATH_SAT/gpm_l1c`:
//!
//! ```text
//! 1C.NOAA18.MHS.XCAL2016-V.20150610-S100245-E114443.051812.V07A.HDF5
//! ```

pub mod error;
pub mod filename;
pub mod index;
pub mod instrument;
pub mod quality;
pub mod search;
pub mod swath;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lizard_common::{DataPaths, Dataset};

pub use error::{GpmError, GpmResult};
pub use filename::{find_granule, granule_id, GranuleFile};
pub use index::{distance_index, roi_index, time_index, SpatialFilter};
pub use instrument::{filename_sat, Instrument};
pub use quality::{flag_gpml1c, FlagReport};
pub use search::{get_files, get_granules, in_roi, TimeFilter};
pub use swath::{parse_file_header, read_all_swaths, read_file, read_swath_file, ReadOptions};

/// Granule archive below the satellite data root.
pub const GPM_L1C_DIR: &str = "gpm_l1c";

/// A GPM L1C granule archive.
#[derive(Debug, Clone, PartialEq)]
pub struct GpmL1c {
    dir: PathBuf,
}

impl GpmL1c {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The archive of the configured satellite root.
    pub fn from_paths(paths: &DataPaths) -> Self {
        Self::new(paths.path_sat.join(GPM_L1C_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File of one granule, e.g. `("ATMS", "SNPP", "038575")`.
    pub fn granule_path(
        &self,
        instrument: Instrument,
        satellite: &str,
        granule: &str,
    ) -> GpmResult<PathBuf> {
        find_granule(&self.dir, filename_sat(instrument, satellite)?, granule)
    }

    /// Geolocation from swath `sg` and brightness temperatures from `st`.
    pub fn read_swath(
        &self,
        instrument: Instrument,
        satellite: &str,
        granule: &str,
        sg: &str,
        st: &str,
        options: &ReadOptions,
    ) -> GpmResult<Dataset> {
        let path = self.granule_path(instrument, satellite, granule)?;
        read_swath_file(&path, instrument, sg, st, options)
    }

    /// All W- and G-band channels of a granule.
    pub fn read(
        &self,
        instrument: Instrument,
        satellite: &str,
        granule: &str,
        options: &ReadOptions,
    ) -> GpmResult<Dataset> {
        let path = self.granule_path(instrument, satellite, granule)?;
        read_file(&path, instrument, options)
    }

    /// Every swath of a granule.
    pub fn read_swaths(
        &self,
        instrument: Instrument,
        satellite: &str,
        granule: &str,
        options: &ReadOptions,
    ) -> GpmResult<BTreeMap<String, Dataset>> {
        let path = self.granule_path(instrument, satellite, granule)?;
        read_all_swaths(&path, instrument, options)
    }

    pub fn get_files(
        &self,
        instrument: Instrument,
        satellite: &str,
        time: &TimeFilter,
    ) -> GpmResult<Vec<GranuleFile>> {
        get_files(&self.dir, instrument, satellite, time)
    }

    pub fn in_roi(
        &self,
        instrument: Instrument,
        satellite: &str,
        time: &TimeFilter,
        spatial: &SpatialFilter,
    ) -> GpmResult<Vec<String>> {
        in_roi(&self.dir, instrument, satellite, time, spatial)
    }

    pub fn get_granules(
        &self,
        sat_ins: &[(&str, Instrument)],
        time: &TimeFilter,
        spatial: &SpatialFilter,
    ) -> GpmResult<BTreeMap<String, Vec<String>>> {
        get_granules(&self.dir, sat_ins, time, spatial)
    }
}

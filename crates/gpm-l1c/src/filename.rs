//! GPM L1C granule file names.
//!
//! `1C.<SAT>.<INSTR>.XCAL<yyyy>-V.<yyyymmdd>-S<hhmmss>-E<hhmmss>.<granule>.V07<x>.HDF5`
//!
//! The date is the start date of the orbit; the end time rolls over to the
//! next day when it is earlier than the start time.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{GpmError, GpmResult};

/// Compiled once on first use and shared by every parse.
static GRANULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^1C\.([A-Z0-9]+\.[A-Z0-9]+)\.XCAL(\d{4})-V\.(\d{8})-S(\d{6})-E(\d{6})\.(\d{6})\.V07([A-Z]?)\.HDF5$",
    )
    .expect("granule name pattern is a valid literal")
});

/// Zero-pad a granule number to six digits.
pub fn granule_id(granule: u32) -> String {
    format!("{:06}", granule)
}

/// Normalise a granule given as text (`"51812"` or `"051812"`).
pub fn normalize_granule(granule: &str) -> String {
    match granule.trim().parse::<u32>() {
        Ok(n) => granule_id(n),
        Err(_) => granule.trim().to_string(),
    }
}

/// Metadata parsed from a granule file name.
#[derive(Debug, Clone, PartialEq)]
pub struct GranuleFile {
    pub path: PathBuf,
    /// Satellite and instrument part, e.g. `NOAA18.MHS`
    pub sat_prefix: String,
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Six digit orbit number
    pub granule: String,
}

impl GranuleFile {
    pub fn parse<P: AsRef<Path>>(path: P) -> GpmResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GpmError::InvalidFilename(path.display().to_string()))?;
        let caps = GRANULE_NAME
            .captures(name)
            .ok_or_else(|| GpmError::InvalidFilename(name.to_string()))?;

        let invalid = || GpmError::InvalidFilename(name.to_string());
        let date = NaiveDate::parse_from_str(&caps[3], "%Y%m%d").map_err(|_| invalid())?;
        let start_time = NaiveTime::parse_from_str(&caps[4], "%H%M%S").map_err(|_| invalid())?;
        let end_time = NaiveTime::parse_from_str(&caps[5], "%H%M%S").map_err(|_| invalid())?;

        let start = Utc.from_utc_datetime(&NaiveDateTime::new(date, start_time));
        let mut end = Utc.from_utc_datetime(&NaiveDateTime::new(date, end_time));
        if end < start {
            end += Duration::days(1);
        }

        Ok(Self {
            path: path.to_path_buf(),
            sat_prefix: caps[1].to_string(),
            date,
            start,
            end,
            granule: caps[6].to_string(),
        })
    }
}

/// All granule files of one satellite/instrument in `dir`, sorted by file
/// name. Files that do not follow the naming convention are ignored.
pub fn list_granule_files(dir: &Path, sat_prefix: &str) -> GpmResult<Vec<GranuleFile>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        match GranuleFile::parse(&path) {
            Ok(file) if file.sat_prefix == sat_prefix => files.push(file),
            Ok(_) => {}
            Err(_) => debug!(file = %path.display(), "Ignoring non-granule file"),
        }
    }
    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(files)
}

/// The file of one granule. Zero matches is an error; with several
/// matches (e.g. two product versions) the first in name order is used.
pub fn find_granule(dir: &Path, sat_prefix: &str, granule: &str) -> GpmResult<PathBuf> {
    let granule = normalize_granule(granule);
    let matches: Vec<GranuleFile> = list_granule_files(dir, sat_prefix)?
        .into_iter()
        .filter(|f| f.granule == granule)
        .collect();

    let pattern = format!(
        "{}/1C.{}.XCAL*.{}.V07*.HDF5",
        dir.display(),
        sat_prefix,
        granule
    );
    match matches.as_slice() {
        [] => Err(GpmError::GranuleNotFound(pattern)),
        [only] => Ok(only.path.clone()),
        [first, ..] => {
            warn!(
                pattern = %pattern,
                matches = matches.len(),
                using = %first.path.display(),
                "Several granule files match, using the first"
            );
            Ok(first.path.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::granules;

    #[test]
    fn test_parse_filename() {
        let f = GranuleFile::parse(Path::new("/sat/gpm_l1c").join(granules::MHS_NOAA18_FILE))
            .unwrap();
        assert_eq!(f.sat_prefix, "NOAA18.MHS");
        assert_eq!(f.granule, "051812");
        assert_eq!(f.start.to_rfc3339(), "2015-06-10T10:14:49+00:00");
        assert_eq!(f.end.to_rfc3339(), "2015-06-10T11:56:09+00:00");
    }

    #[test]
    fn test_end_time_rolls_over_midnight() {
        let f = GranuleFile::parse(
            "1C.NPP.ATMS.XCAL2019-V.20190331-S231512-E005642.038575.V07A.HDF5",
        )
        .unwrap();
        assert_eq!(f.end.to_rfc3339(), "2019-04-01T00:56:42+00:00");
        assert!(f.end > f.start);
    }

    #[test]
    fn test_rejects_other_names() {
        assert!(GranuleFile::parse("2A.GPM.DPR.V9-20211125.20190331-S231512-E005642.038575.V07A.HDF5").is_err());
        assert!(GranuleFile::parse("1C.NPP.ATMS.XCAL2019-V.20190331-S231512-E005642.038575.V07A.nc").is_err());
    }

    #[test]
    fn test_parse_many_names_with_one_pattern() {
        let ids: Vec<String> = (0..50)
            .map(|g| {
                GranuleFile::parse(format!(
                    "1C.METOPB.MHS.XCAL2016-V.20220320-S00{:02}00-E00{:02}30.{}.V07A.HDF5",
                    g,
                    g,
                    granule_id(49000 + g)
                ))
                .unwrap()
                .granule
            })
            .collect();
        assert_eq!(ids.first().map(String::as_str), Some("049000"));
        assert_eq!(ids.last().map(String::as_str), Some("049049"));
        assert!(GRANULE_NAME.is_match(granules::MHS_NOAA18_FILE));
    }

    #[test]
    fn test_granule_padding() {
        assert_eq!(granule_id(7068), "007068");
        assert_eq!(normalize_granule("51812"), "051812");
        assert_eq!(normalize_granule("051812"), "051812");
    }

    #[test]
    fn test_find_granule() {
        let dir = tempfile::tempdir().unwrap();
        let names = [
            "1C.NPP.ATMS.XCAL2019-V.20190331-S231512-E005642.038575.V07B.HDF5",
            "1C.NPP.ATMS.XCAL2019-V.20190331-S231512-E005642.038575.V07A.HDF5",
            "1C.NOAA20.ATMS.XCAL2019-V.20190331-S000000-E014000.007068.V07A.HDF5",
        ];
        for name in names {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let path = find_granule(dir.path(), "NPP.ATMS", "38575").unwrap();
        assert!(path.to_string_lossy().ends_with("V07A.HDF5"));
        assert!(matches!(
            find_granule(dir.path(), "NPP.ATMS", "007068"),
            Err(GpmError::GranuleNotFound(_))
        ));
        assert_eq!(list_granule_files(dir.path(), "NOAA20.ATMS").unwrap().len(), 1);
    }
}

//! Nose boom meteorology on Polar 5.
//!
//! ACLOUD and AFLUX use 1 s ASCII files from the campaign archive, because
//! the catalog versions of these campaigns lack relative humidity:
//!
//! ```text
//! $PATH_DAT/obs/campaigns/<mission>/p5/noseboom/<YYYY>/<MM>/<DD>/Flight_<YYYYmmdd>_<NN>_P5_1s.asc
//! ```
//!
//! Other campaigns are read from the `NOSE_BOOM` catalog product. HALO-AC3
//! has no nose boom data. In both sources the time is stored as seconds
//! since midnight of the flight date.

use std::path::{Path, PathBuf};

use flight_meta::Flight;
use lizard_common::time::{start_of_day, to_unix_seconds, UNIX_TIME_UNITS};
use lizard_common::{DataPaths, Dataset, Variable};
use tracing::{debug, warn};

use crate::archive::{clip_to_flight, date_str, flight_key};
use crate::error::{ReaderError, ReaderResult};
use crate::local_catalog::LocalCatalog;

pub const NOSE_BOOM: &str = "NOSE_BOOM";

/// Missions read from the ASCII archive.
pub const ASCII_MISSIONS: [&str; 2] = ["ACLOUD", "AFLUX"];

/// Flights without nose boom data.
pub const MISSING_FLIGHTS: [&str; 1] = ["AFLUX_P5_RF02"];

const COMMENT: char = '!';

pub fn noseboom_ascii_path(paths: &DataPaths, flight: &Flight) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    let number = key.name.get(2..).unwrap_or_default();
    Ok(paths
        .path_dat
        .join("obs/campaigns")
        .join(key.mission.to_lowercase())
        .join("p5/noseboom")
        .join(flight.date.format("%Y/%m/%d").to_string())
        .join(format!("Flight_{}_{}_P5_1s.asc", date_str(flight), number)))
}

/// Parse a whitespace separated table with a header line. Text after `!`
/// is ignored. Every column becomes a variable on `t`, the `UTC` column
/// is renamed to `t`.
pub fn parse_noseboom_ascii(text: &str, path: &Path) -> ReaderResult<Dataset> {
    let parse_error = |line: usize, message: String| ReaderError::Parse {
        path: path.display().to_string(),
        line,
        message,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split(COMMENT).next().unwrap_or_default().trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header line".to_string()))?;
    let names: Vec<&str> = header.split_whitespace().collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for (number, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != names.len() {
            return Err(parse_error(
                number,
                format!("expected {} columns, found {}", names.len(), fields.len()),
            ));
        }
        for (column, field) in columns.iter_mut().zip(&fields) {
            let value = field
                .parse::<f64>()
                .map_err(|_| parse_error(number, format!("invalid number '{}'", field)))?;
            column.push(value);
        }
    }

    let mut ds = Dataset::new();
    for (name, values) in names.iter().zip(columns) {
        let name = if *name == "UTC" { "t" } else { *name };
        let var = Variable::from_vec("t", values);
        if name == "t" {
            ds.insert_coord(name, var)?;
        } else {
            ds.insert_var(name, var)?;
        }
    }
    debug!(file = %path.display(), samples = ds.dim_len("t").unwrap_or(0), "Parsed nose boom table");
    Ok(ds)
}

/// Replace seconds since midnight of the flight date on `t` by the `time`
/// coordinate in unix seconds.
pub fn seconds_of_day_to_time(ds: &mut Dataset, flight: &Flight) -> ReaderResult<()> {
    let midnight = to_unix_seconds(start_of_day(flight.date));
    let mut t = ds.remove("t").ok_or_else(|| ReaderError::MissingTime(flight.flight_id.clone()))?;
    t.data.mapv_inplace(|s| midnight + s);
    t.rename_dim("t", "time");
    ds.rename_dim("t", "time");
    ds.insert_coord("time", t.with_attr("units", UNIX_TIME_UNITS))?;
    Ok(())
}

/// Nose boom data between takeoff and landing, `None` for flights without
/// data.
pub fn read_noseboom(paths: &DataPaths, catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Option<Dataset>> {
    let key = flight_key(flight)?;
    if key.mission == "HALO-AC3" || MISSING_FLIGHTS.contains(&flight.flight_id.as_str()) {
        warn!(flight_id = %flight.flight_id, "No nose boom data for flight");
        return Ok(None);
    }

    let mut ds = if ASCII_MISSIONS.contains(&key.mission.as_str()) {
        let path = noseboom_ascii_path(paths, flight)?;
        if !path.is_file() {
            return Err(ReaderError::FileNotFound(path));
        }
        debug!(flight_id = %flight.flight_id, "Reading nose boom from the ASCII archive");
        parse_noseboom_ascii(&std::fs::read_to_string(&path)?, &path)?
    } else {
        catalog.read(&key.mission, &key.platform, NOSE_BOOM, &flight.flight_id)?
    };

    seconds_of_day_to_time(&mut ds, flight)?;
    Ok(Some(clip_to_flight(&ds, flight)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flight;

    const TABLE: &str = "\
! nose boom 1 s data, AFLUX RF08
! UTC in seconds of the day
UTC        h      lon     lat      p      rh       T
28799.0  120.5  15.501  78.245  1001.2  85.0  -12.4
28800.0  121.0  15.502  78.246  1001.1  85.5  -12.5   ! takeoff
28801.0  125.0  15.503  78.247  1000.8   nan  -12.6
";

    #[test]
    fn test_ascii_path() {
        let f = flight("AFLUX_P5_RF08");
        assert_eq!(
            noseboom_ascii_path(&DataPaths::under("/data"), &f).unwrap(),
            PathBuf::from("/data/dat/obs/campaigns/aflux/p5/noseboom/2022/03/20/Flight_20220320_08_P5_1s.asc")
        );
    }

    #[test]
    fn test_parse_table() {
        let ds = parse_noseboom_ascii(TABLE, Path::new("table.asc")).unwrap();
        assert!(ds.is_coord("t"));
        assert_eq!(ds.values("t").unwrap(), vec![28799.0, 28800.0, 28801.0]);
        assert_eq!(ds.values("T").unwrap(), vec![-12.4, -12.5, -12.6]);
        assert!(ds.values("rh").unwrap()[2].is_nan());

        let short = "UTC h\n1.0 2.0\n3.0\n";
        assert!(matches!(
            parse_noseboom_ascii(short, Path::new("short.asc")),
            Err(ReaderError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_read_ascii_clips_to_flight() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let catalog = LocalCatalog::new(dir.path().join("intake"));
        let f = flight("AFLUX_P5_RF08");
        let path = noseboom_ascii_path(&paths, &f).unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, TABLE).unwrap();

        let ds = read_noseboom(&paths, &catalog, &f).unwrap().unwrap();
        let takeoff = to_unix_seconds(f.takeoff);
        assert_eq!(ds.values("time").unwrap(), vec![takeoff, takeoff + 1.0]);
        assert_eq!(ds.values("h").unwrap(), vec![121.0, 125.0]);
        assert!(!ds.contains("t"));
    }

    #[test]
    fn test_read_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let catalog = LocalCatalog::new(dir.path().join("intake"));
        let f = flight("MOSAiC-ACA_P5_RF06");

        let mut boom = Dataset::new();
        boom.insert_coord("t", Variable::from_vec("t", vec![28000.0, 36000.0, 60000.0]))
            .unwrap();
        boom.insert_var("T", Variable::from_vec("t", vec![-5.0, -6.0, -7.0])).unwrap();
        netcdf_io::write_dataset(&boom, catalog.entry_path("MOSAiC-ACA", "P5", NOSE_BOOM, "MOSAiC-ACA_P5_RF06"))
            .unwrap();

        let ds = read_noseboom(&paths, &catalog, &f).unwrap().unwrap();
        let midnight = to_unix_seconds(f.takeoff) - 8.0 * 3600.0;
        assert_eq!(ds.values("time").unwrap(), vec![midnight + 36000.0]);
        assert_eq!(ds.values("T").unwrap(), vec![-6.0]);
    }

    #[test]
    fn test_flights_without_data() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let catalog = LocalCatalog::new(dir.path().join("intake"));
        assert!(read_noseboom(&paths, &catalog, &flight("AFLUX_P5_RF02")).unwrap().is_none());
        assert!(read_noseboom(&paths, &catalog, &flight("HALO-AC3_P5_RF05")).unwrap().is_none());
        assert!(matches!(
            read_noseboom(&paths, &catalog, &flight("ACLOUD_P5_RF05")),
            Err(ReaderError::FileNotFound(_))
        ));
    }
}

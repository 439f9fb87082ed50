//! MiRAC-A brightness temperatures from the raw RPG files.
//!
//! Raw files store whole-second time stamps plus a millisecond offset
//! (`sample_tms`). The reader restores the exact sample times and then
//! interpolates to full seconds.

use std::path::PathBuf;

use flight_meta::Flight;
use lizard_common::time::UNIX_TIME_UNITS;
use lizard_common::{DataPaths, Dataset, Variable};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive::{self, clip_to_flight, flight_key, interp};
use crate::error::ReaderResult;

const RAW_VARIABLES: [&str; 2] = ["tb", "t_rec"];

/// Directory with the raw files of a flight day.
pub fn raw_dir(paths: &DataPaths, flight: &Flight) -> ReaderResult<PathBuf> {
    let key = flight_key(flight)?;
    Ok(paths
        .path_dat
        .join("obs/campaigns")
        .join(key.mission.to_lowercase())
        .join("p5/mirac_radar/raw")
        .join(flight.date.format("%Y/%m/%d").to_string()))
}

/// Raw files of a flight day: NetCDF files whose name contains `YYMMDD`.
pub fn raw_files(paths: &DataPaths, flight: &Flight) -> ReaderResult<Vec<PathBuf>> {
    let dir = raw_dir(paths, flight)?;
    let tag = flight.date.format("%y%m%d").to_string();
    let mut files: Vec<PathBuf> = WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".nc") && n.contains(&tag))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Raw TBs of a flight at full seconds between takeoff and landing.
/// Returns `None` when no raw file exists.
pub fn read_mirac_a_tb_raw(paths: &DataPaths, flight: &Flight) -> ReaderResult<Option<Dataset>> {
    let files = raw_files(paths, flight)?;
    if files.is_empty() {
        debug!(flight_id = %flight.flight_id, "No raw MiRAC-A files");
        return Ok(None);
    }

    let mut samples: Vec<(f64, [f64; 2])> = Vec::new();
    for file in &files {
        let ds = archive::open(file)?;
        let time = ds.values("time")?;
        let ms = ds.values("sample_tms")?;
        let tb = ds.values("tb")?;
        let t_rec = ds.values("t_rec")?;
        for i in 0..time.len() {
            samples.push((time[i] + ms[i] / 1000.0, [tb[i], t_rec[i]]));
        }
    }

    let ds = full_seconds(samples)?;
    let ds = clip_to_flight(&ds, flight)?;
    info!(
        flight_id = %flight.flight_id,
        files = files.len(),
        n_times = ds.dim_len("time").unwrap_or(0),
        "Read raw MiRAC-A TB"
    );
    Ok(Some(ds))
}

/// Interpolate samples `(time, [tb, t_rec])` to every full second that
/// lies within the sampled period.
pub fn full_seconds(mut samples: Vec<(f64, [f64; 2])>) -> ReaderResult<Dataset> {
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    let x: Vec<f64> = samples.iter().map(|s| s.0).collect();

    let mut target: Vec<f64> = x
        .iter()
        .flat_map(|t| {
            let s = t.floor();
            [s, s + 1.0]
        })
        .collect();
    target.sort_by(f64::total_cmp);
    target.dedup();

    let columns: Vec<Vec<f64>> = (0..RAW_VARIABLES.len())
        .map(|k| {
            let y: Vec<f64> = samples.iter().map(|s| s.1[k]).collect();
            target.iter().map(|t| interp(&x, &y, *t)).collect()
        })
        .collect();

    let keep: Vec<usize> = (0..target.len()).filter(|&i| !columns[0][i].is_nan()).collect();

    let mut ds = Dataset::new();
    ds.insert_coord(
        "time",
        Variable::from_vec("time", keep.iter().map(|&i| target[i]).collect())
            .with_attr("units", UNIX_TIME_UNITS),
    )?;
    for (name, column) in RAW_VARIABLES.iter().zip(columns) {
        ds.insert_var(
            name,
            Variable::from_vec("time", keep.iter().map(|&i| column[i]).collect()),
        )?;
    }
    if let Some(tb) = ds.get_mut("tb") {
        tb.attrs.insert("units".to_string(), "K".into());
    }
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flight;

    #[test]
    fn test_full_seconds() {
        let samples = vec![
            (101.5, [200.0, 300.0]),
            (100.25, [190.0, 300.0]),
            (102.5, [210.0, 302.0]),
        ];
        let ds = full_seconds(samples).unwrap();
        // 100 lies before the first sample, 103 after the last
        assert_eq!(ds.values("time").unwrap(), vec![101.0, 102.0]);
        assert_eq!(ds.values("tb").unwrap(), vec![196.0, 205.0]);
        assert_eq!(ds.values("t_rec").unwrap(), vec![300.0, 301.0]);
    }

    #[test]
    fn test_raw_files_by_date_tag() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let f = flight("ACLOUD_P5_RF05");
        let raw = raw_dir(&paths, &f).unwrap();
        assert!(raw.ends_with("obs/campaigns/acloud/p5/mirac_radar/raw/2022/03/20"));

        std::fs::create_dir_all(&raw).unwrap();
        for name in ["220320_120000_P05.LV0.nc", "220320_100000_P05.LV0.nc", "220321_000000.nc", "220320.txt"] {
            std::fs::write(raw.join(name), b"").unwrap();
        }
        let names: Vec<String> = raw_files(&paths, &f)
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["220320_100000_P05.LV0.nc", "220320_120000_P05.LV0.nc"]);

        let missing = flight("ACLOUD_P5_RF06");
        let empty = DataPaths::under(dir.path().join("none"));
        assert!(read_mirac_a_tb_raw(&empty, &missing).unwrap().is_none());
    }
}

//! Dropsondes of a research flight.
//!
//! Soundings are cached in the local catalog as numbered entries
//! (`<FLIGHT_ID>_01`, `<FLIGHT_ID>_02`, ...) of the `DROPSONDES` product.
//! ACLOUD, AFLUX and MOSAiC-ACA files store the launch time as an
//! `HH:MM:SS` attribute and the profile time in decimal hours of the
//! flight day; both are converted to unix seconds here.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use flight_meta::Flight;
use lizard_common::time::{start_of_day, to_unix_seconds, UNIX_TIME_UNITS};
use lizard_common::{Dataset, Variable};
use tracing::{debug, info};

use crate::archive::flight_key;
use crate::error::{ReaderError, ReaderResult};
use crate::local_catalog::LocalCatalog;

pub const DROPSONDES: &str = "DROPSONDES";

/// Missions whose sonde files carry the launch time as an attribute.
pub const LAUNCH_ATTR_MISSIONS: [&str; 3] = ["ACLOUD", "AFLUX", "MOSAiC-ACA"];

/// Launch time from a flight date and an `HH:MM:SS` string.
pub fn parse_launch_time(date: NaiveDate, hms: &str) -> ReaderResult<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(hms.trim(), "%H:%M:%S")
        .map_err(|_| ReaderError::InvalidLaunchTime(hms.to_string()))?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Add a scalar `launch_time` from the `Launch_Time_UTC` attribute.
pub fn add_launch_time(ds: &mut Dataset, date: NaiveDate) -> ReaderResult<()> {
    let hms = ds
        .attrs
        .get("Launch_Time_UTC")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ReaderError::InvalidLaunchTime(String::new()))?
        .to_string();
    let launch = parse_launch_time(date, &hms)?;
    ds.insert_var(
        "launch_time",
        Variable::scalar(to_unix_seconds(launch)).with_attr("units", UNIX_TIME_UNITS),
    )?;
    Ok(())
}

/// Replace the sample counter `z` by the profile time `Time`, converted
/// from decimal hours of `date` to unix seconds.
pub fn time_as_index(ds: &mut Dataset, date: NaiveDate) -> ReaderResult<()> {
    let day = to_unix_seconds(start_of_day(date));
    let seconds: Vec<f64> = ds
        .values("Time")?
        .into_iter()
        .map(|hours| day + hours * 3600.0)
        .collect();

    ds.remove("Time");
    ds.remove("z");
    ds.rename_dim("z", "Time");
    ds.insert_coord(
        "Time",
        Variable::from_vec("Time", seconds).with_attr("units", UNIX_TIME_UNITS),
    )?;
    Ok(())
}

/// All dropsondes of a flight keyed by `<FLIGHT_ID>_<NN>`.
pub fn read_dropsondes(
    catalog: &LocalCatalog,
    flight: &Flight,
) -> ReaderResult<BTreeMap<String, Dataset>> {
    let key = flight_key(flight)?;
    let entries =
        catalog.numbered_entries(&key.mission, &key.platform, DROPSONDES, &flight.flight_id);

    let mut sondes = BTreeMap::new();
    for entry in entries {
        let mut ds = catalog.read(&key.mission, &key.platform, DROPSONDES, &entry)?;

        if LAUNCH_ATTR_MISSIONS.contains(&key.mission.as_str()) {
            add_launch_time(&mut ds, flight.date)?;
            time_as_index(&mut ds, flight.date)?;
        } else if key.mission == "HALO-AC3" && key.platform == "P5" {
            ds.rename("base_time", "launch_time")?;
        }

        debug!(sonde = %entry, "Read dropsonde");
        sondes.insert(entry, ds);
    }
    info!(flight_id = %flight.flight_id, count = sondes.len(), "Read dropsondes");
    Ok(sondes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lizard_common::AttrValue;

    #[test]
    fn test_parse_launch_time() {
        let date = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
        assert_eq!(
            parse_launch_time(date, "10:45:07").unwrap(),
            Utc.with_ymd_and_hms(2019, 4, 1, 10, 45, 7).unwrap()
        );
        assert!(matches!(
            parse_launch_time(date, "10:45"),
            Err(ReaderError::InvalidLaunchTime(_))
        ));
        assert!(parse_launch_time(date, "25:00:00").is_err());
    }

    #[test]
    fn test_sonde_times() {
        let date = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
        let day = to_unix_seconds(start_of_day(date));

        let mut ds = Dataset::new();
        ds.attrs
            .insert("Launch_Time_UTC".into(), AttrValue::from("10:00:00"));
        ds.insert_coord("z", Variable::from_vec("z", vec![0.0, 1.0, 2.0]))
            .unwrap();
        ds.insert_var("Time", Variable::from_vec("z", vec![10.0, 10.25, 10.5]))
            .unwrap();
        ds.insert_var("T", Variable::from_vec("z", vec![-5.0, -6.0, -7.0]))
            .unwrap();

        add_launch_time(&mut ds, date).unwrap();
        time_as_index(&mut ds, date).unwrap();

        assert_eq!(ds.values("launch_time").unwrap(), vec![day + 36000.0]);
        assert!(ds.is_coord("Time"));
        assert!(!ds.contains("z"));
        assert_eq!(
            ds.values("Time").unwrap(),
            vec![day + 36000.0, day + 36900.0, day + 37800.0]
        );
        assert_eq!(ds.var("T").unwrap().dims, vec!["Time"]);
    }
}

//! ESA CCI sea and ice surface temperature along flight tracks.

use flight_meta::Flight;
use lizard_common::Dataset;

use crate::archive::{clip_to_flight, flight_key};
use crate::error::ReaderResult;
use crate::local_catalog::LocalCatalog;

pub const ESA_CCI_SST: &str = "ESA_CCI_SST";

/// Surface temperature between takeoff and landing.
pub fn read_surftemp(catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Dataset> {
    let key = flight_key(flight)?;
    let ds = catalog.read(&key.mission, &key.platform, ESA_CCI_SST, &flight.flight_id)?;
    clip_to_flight(&ds, flight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flight;
    use lizard_common::time::{to_unix_seconds, UNIX_TIME_UNITS};
    use lizard_common::Variable;

    #[test]
    fn test_read_clips_to_flight() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LocalCatalog::new(dir.path());
        let f = flight("HALO-AC3_P5_RF07");
        let takeoff = to_unix_seconds(f.takeoff);
        let landing = to_unix_seconds(f.landing);

        let mut sst = Dataset::new();
        sst.insert_coord(
            "time",
            Variable::from_vec("time", vec![takeoff - 60.0, takeoff, landing, landing + 60.0])
                .with_attr("units", UNIX_TIME_UNITS),
        )
        .unwrap();
        sst.insert_var("sst", Variable::from_vec("time", vec![271.0, 271.2, 268.4, 268.0]))
            .unwrap();
        netcdf_io::write_dataset(
            &sst,
            catalog.entry_path("HALO-AC3", "P5", ESA_CCI_SST, "HALO-AC3_P5_RF07"),
        )
        .unwrap();

        let ds = read_surftemp(&catalog, &f).unwrap();
        assert_eq!(ds.values("time").unwrap(), vec![takeoff, landing]);
        assert_eq!(ds.values("sst").unwrap(), vec![271.2, 268.4]);
    }
}

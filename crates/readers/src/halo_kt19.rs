//! KT-19 infrared thermometer on HALO.
//!
//! The brightness temperature is renamed to `KT19` like on Polar 5. The
//! internal sensor temperature and the assumed emissivity are dropped.

use flight_meta::Flight;
use lizard_common::Dataset;

use crate::archive::flight_key;
use crate::error::ReaderResult;
use crate::local_catalog::LocalCatalog;

pub const KT19: &str = "KT19";

pub fn read_halo_kt19(catalog: &LocalCatalog, flight: &Flight) -> ReaderResult<Dataset> {
    let key = flight_key(flight)?;
    let mut ds = catalog.read(&key.mission, &key.platform, KT19, &flight.flight_id)?;
    ds.drop_vars(&["temp_KT19", "emis"]);
    ds.rename("temp_bright", "KT19")?;
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::flight;
    use lizard_common::Variable;

    #[test]
    fn test_read_renames_brightness_temperature() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LocalCatalog::new(dir.path());
        let f = flight("HALO-AC3_HALO_RF04");

        let mut kt19 = Dataset::new();
        kt19.insert_coord("time", Variable::from_vec("time", vec![0.0, 1.0])).unwrap();
        kt19.insert_var("temp_bright", Variable::from_vec("time", vec![250.5, 251.0]))
            .unwrap();
        kt19.insert_var("temp_KT19", Variable::from_vec("time", vec![290.0, 290.1]))
            .unwrap();
        kt19.insert_var("emis", Variable::from_vec("time", vec![0.98, 0.98])).unwrap();
        netcdf_io::write_dataset(&kt19, catalog.entry_path("HALO-AC3", "HALO", KT19, "HALO-AC3_HALO_RF04"))
            .unwrap();

        let ds = read_halo_kt19(&catalog, &f).unwrap();
        assert_eq!(ds.values("KT19").unwrap(), vec![250.5, 251.0]);
        assert!(!ds.contains("temp_bright"));
        assert!(!ds.contains("temp_KT19"));
        assert!(!ds.contains("emis"));
    }
}

//! AMALi airborne lidar on Polar 5.
//!
//! ```text
//! $PATH_SEC/data/ac3/amali/l1/<FLIGHT_ID>_AMALi_l1_<YYYYmmdd>.nc
//! $PATH_SEC/data/ac3/amali/l2_cm/<FLIGHT_ID>_AMALi_l2_cm_<YYYYmmdd>.nc
//! $PATH_SEC/data/ac3/amali/l2_cth/<FLIGHT_ID>_AMALi_l2_cth_<YYYYmmdd>.nc
//! ```

use std::path::PathBuf;

use flight_meta::Flight;
use lizard_common::{DataPaths, Dataset};
use tracing::debug;

use crate::archive::{self, date_str};
use crate::error::ReaderResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmaliProduct {
    /// Attenuated backscatter
    L1,
    /// Cloud mask
    CloudMask,
    /// Cloud top height
    CloudTopHeight,
}

impl AmaliProduct {
    fn tag(&self) -> &'static str {
        match self {
            AmaliProduct::L1 => "l1",
            AmaliProduct::CloudMask => "l2_cm",
            AmaliProduct::CloudTopHeight => "l2_cth",
        }
    }
}

pub fn amali_path(paths: &DataPaths, flight: &Flight, product: AmaliProduct) -> PathBuf {
    paths
        .path_sec
        .join("data/ac3/amali")
        .join(product.tag())
        .join(format!(
            "{}_AMALi_{}_{}.nc",
            flight.flight_id,
            product.tag(),
            date_str(flight)
        ))
}

pub fn read_amali(paths: &DataPaths, flight: &Flight, product: AmaliProduct) -> ReaderResult<Dataset> {
    let ds = archive::open(&amali_path(paths, flight, product))?;
    debug!(flight_id = %flight.flight_id, product = product.tag(), "Read AMALi");
    Ok(ds)
}

pub fn read_amali_l1(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    read_amali(paths, flight, AmaliProduct::L1)
}

pub fn read_amali_l2cm(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    read_amali(paths, flight, AmaliProduct::CloudMask)
}

pub fn read_amali_l2cth(paths: &DataPaths, flight: &Flight) -> ReaderResult<Dataset> {
    read_amali(paths, flight, AmaliProduct::CloudTopHeight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReaderError;
    use crate::testing::flight;
    use lizard_common::Variable;

    #[test]
    fn test_paths() {
        let paths = DataPaths::under("/data");
        let f = flight("HALO-AC3_P5_RF05");
        assert_eq!(
            amali_path(&paths, &f, AmaliProduct::CloudMask),
            PathBuf::from("/data/sec/data/ac3/amali/l2_cm/HALO-AC3_P5_RF05_AMALi_l2_cm_20220320.nc")
        );
        assert!(amali_path(&paths, &f, AmaliProduct::L1).ends_with("l1/HALO-AC3_P5_RF05_AMALi_l1_20220320.nc"));
    }

    #[test]
    fn test_read_levels() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::under(dir.path());
        let f = flight("HALO-AC3_P5_RF05");

        let mut cth = Dataset::new();
        cth.insert_coord("time", Variable::from_vec("time", vec![0.0, 1.0, 2.0]))
            .unwrap();
        cth.insert_var(
            "cloud_top_height",
            Variable::from_vec("time", vec![850.0, f64::NAN, 1200.0]).with_attr("units", "m"),
        )
        .unwrap();
        netcdf_io::write_dataset(&cth, amali_path(&paths, &f, AmaliProduct::CloudTopHeight)).unwrap();

        let ds = read_amali_l2cth(&paths, &f).unwrap();
        let heights = ds.values("cloud_top_height").unwrap();
        assert_eq!(heights[0], 850.0);
        assert!(heights[1].is_nan());
        assert_eq!(ds.var("cloud_top_height").unwrap().attr_str("units"), Some("m"));

        assert!(matches!(read_amali_l1(&paths, &f), Err(ReaderError::FileNotFound(_))));
        assert!(matches!(read_amali_l2cm(&paths, &f), Err(ReaderError::FileNotFound(_))));
    }
}

//! Readers and writers of airborne and satellite products.
//!
//! Every reader is a path convention below one of the [`DataPaths`] roots
//! plus light, product-specific clean-up. Products that were fetched from
//! the campaign data server are read from the [`LocalCatalog`] mirror.
//!
//! [`DataPaths`]: lizard_common::DataPaths

pub mod amali;
pub mod amsr2_sic;
pub mod amsr2_sic_track;
pub mod archive;
pub mod band_pass;
pub mod bbr;
pub mod dropsondes;
pub mod era5;
pub mod error;
pub mod footprint;
pub mod gps_ins;
pub mod halo_kt19;
pub mod hamp;
pub mod local_catalog;
pub mod mira;
pub mod mirac_a;
pub mod mirac_a_raw;
pub mod multiyearice;
pub mod noseboom;
pub mod pamtra;
pub mod pamtra_dropsondes;
pub mod pamtra_era5;
pub mod radiosonde;
pub mod sat_at_aircraft;
pub mod surftemp;
pub mod wales;

pub use amali::AmaliProduct;
pub use band_pass::{BandPass, Channel, ChannelPolarization};
pub use bbr::BbrOptions;
pub use error::{ReaderError, ReaderResult};
pub use hamp::{read_hamp, read_hamp_uncorrected, HampCalibration};
pub use local_catalog::LocalCatalog;
pub use mirac_a::{read_mirac_a, read_mirac_a_tb, TbLevel};

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{NaiveDate, TimeZone, Utc};
    use flight_meta::Flight;

    /// Flight on 2022-03-20 from 08:00 to 14:00 UTC without segments.
    pub fn flight(flight_id: &str) -> Flight {
        let parts: Vec<&str> = flight_id.split('_').collect();
        Flight {
            mission: parts[0].to_string(),
            platform: parts[1].to_string(),
            flight_id: flight_id.to_string(),
            name: None,
            date: NaiveDate::from_ymd_opt(2022, 3, 20).unwrap(),
            takeoff: Utc.with_ymd_and_hms(2022, 3, 20, 8, 0, 0).unwrap(),
            landing: Utc.with_ymd_and_hms(2022, 3, 20, 14, 0, 0).unwrap(),
            segments: Vec::new(),
        }
    }
}

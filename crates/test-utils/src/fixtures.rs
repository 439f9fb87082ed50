//! Reference identifiers used across the lizard tests.

/// Regions of interest as `[lon0, lon1, lat0, lat1]`.
pub mod roi {
    /// Whole globe
    pub const GLOBE: [f64; 4] = [-180.0, 180.0, -90.0, 90.0];

    /// Svalbard and the Fram Strait
    pub const SVALBARD: [f64; 4] = [0.0, 30.0, 76.0, 82.0];
}

/// Reference GPM L1C granules from the regression suite.
pub mod granules {
    /// ATMS on Suomi-NPP, read over the whole globe
    pub const ATMS_SNPP_GLOBE: &str = "038575";

    /// ATMS on Suomi-NPP, read around 85N 45E
    pub const ATMS_SNPP_NEAR_POLE: &str = "041324";

    /// MHS on NOAA-18 overpass near 82N on 2015-06-10
    pub const MHS_NOAA18: &str = "051812";

    pub const MHS_NOAA18_FILE: &str =
        "1C.NOAA18.MHS.XCAL2016-V.20150610-S101449-E115609.051812.V07A.HDF5";
}

/// Flight identifiers.
pub mod flights {
    pub const ACLOUD_RF05: &str = "ACLOUD_P5_RF05";
    pub const HALO_AC3_P5_RF04: &str = "HALO-AC3_P5_RF04";
    pub const HALO_AC3_HALO_RF00: &str = "HALO-AC3_HALO_RF00";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globe_covers_everything() {
        assert_eq!(roi::GLOBE[1] - roi::GLOBE[0], 360.0);
        assert!(granules::MHS_NOAA18_FILE.contains(granules::MHS_NOAA18));
    }
}

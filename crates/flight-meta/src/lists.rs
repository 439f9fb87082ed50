//! Instrument availability lists for the Polar 5 campaigns.

use crate::catalog::FlightCatalog;

/// Campaigns flown by Polar 5 with the microwave payload.
pub const P5_MISSIONS: [&str; 4] = ["ACLOUD", "AFLUX", "MOSAiC-ACA", "HALO-AC3"];

const NO_DROPSONDES: [&str; 13] = [
    "ACLOUD_P5_RF04",
    "ACLOUD_P5_RF08",
    "ACLOUD_P5_RF15",
    "ACLOUD_P5_RF25",
    "AFLUX_P5_RF03",
    "AFLUX_P5_RF11",
    "AFLUX_P5_RF12",
    "AFLUX_P5_RF13",
    "AFLUX_P5_RF14",
    "HALO-AC3_P5_RF06",
    "MOSAiC-ACA_P5_RF02",
    "MOSAiC-ACA_P5_RF03",
    "MOSAiC-ACA_P5_RF04",
];

const NO_AMALI: [&str; 7] = [
    "ACLOUD_P5_RF15",
    "AFLUX_P5_RF02",
    "MOSAiC-ACA_P5_RF02",
    "MOSAiC-ACA_P5_RF03",
    // laser off throughout the flight
    "MOSAiC-ACA_P5_RF09",
    "HALO-AC3_P5_RF02",
    "HALO-AC3_P5_RF06",
];

/// AMALi pointed upward during this flight.
const AMALI_UPWARD: &str = "ACLOUD_P5_RF10";

const NO_MIRAC_A: [&str; 1] = ["ACLOUD_P5_RF13"];

const NO_MIRAC_P_HATPRO: [&str; 1] = ["MOSAiC-ACA_P5_RF03"];

fn p5_flights_without(catalog: &FlightCatalog, excluded: &[&str]) -> Vec<String> {
    catalog
        .get_all_flights(&P5_MISSIONS, &["P5"])
        .into_iter()
        .filter(|id| !excluded.contains(&id.as_str()))
        .collect()
}

/// Polar 5 flights with dropsonde launches.
pub fn get_dropsonde_flight_ids(catalog: &FlightCatalog) -> Vec<String> {
    p5_flights_without(catalog, &NO_DROPSONDES)
}

/// Polar 5 flights where AMALi measured.
pub fn get_amali_flight_ids(catalog: &FlightCatalog, only_downward: bool) -> Vec<String> {
    let mut ids = p5_flights_without(catalog, &NO_AMALI);
    if only_downward {
        ids.retain(|id| id != AMALI_UPWARD);
    }
    ids
}

/// Polar 5 flights where MiRAC-A measured, test flights included.
pub fn get_mirac_a_flight_ids(catalog: &FlightCatalog) -> Vec<String> {
    p5_flights_without(catalog, &NO_MIRAC_A)
}

/// Polar 5 flights where MiRAC-P and HATPRO measured.
pub fn get_mirac_p_hatpro_flight_ids(catalog: &FlightCatalog) -> Vec<String> {
    p5_flights_without(catalog, &NO_MIRAC_P_HATPRO)
}

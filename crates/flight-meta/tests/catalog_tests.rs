//! Flight catalog loading from the ac3airborne directory layout.

use std::fs;

use flight_meta::lists::{
    get_amali_flight_ids, get_dropsonde_flight_ids, get_mirac_a_flight_ids,
    get_mirac_p_hatpro_flight_ids,
};
use flight_meta::FlightCatalog;
use test_utils::require_test_file;

fn write_flight(root: &std::path::Path, mission: &str, name: &str) {
    let dir = root.join(mission).join("P5");
    fs::create_dir_all(&dir).unwrap();
    let flight_id = format!("{}_P5_{}", mission, name);
    let yaml = format!(
        "mission: {mission}\nplatform: P5\nflight_id: {flight_id}\nname: {name}\n\
         date: 2017-05-25\ntakeoff: 2017-05-25 08:00:00\nlanding: 2017-05-25 14:00:00\n\
         segments: []\n"
    );
    fs::write(dir.join(format!("{}.yaml", flight_id)), yaml).unwrap();
}

#[test]
fn test_catalog_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["RF04", "RF10", "RF13", "RF15"] {
        write_flight(dir.path(), "ACLOUD", name);
    }
    write_flight(dir.path(), "MOSAiC-ACA", "RF03");
    fs::write(dir.path().join("README.md"), "not a flight").unwrap();
    fs::write(dir.path().join("ACLOUD").join("broken.yaml"), "mission: [").unwrap();

    let cat = FlightCatalog::from_path(dir.path()).unwrap();
    assert_eq!(cat.len(), 5);

    assert_eq!(
        get_dropsonde_flight_ids(&cat),
        vec!["ACLOUD_P5_RF10", "ACLOUD_P5_RF13"]
    );
    assert_eq!(
        get_amali_flight_ids(&cat, false),
        vec!["ACLOUD_P5_RF04", "ACLOUD_P5_RF10", "ACLOUD_P5_RF13"]
    );
    assert_eq!(
        get_amali_flight_ids(&cat, true),
        vec!["ACLOUD_P5_RF04", "ACLOUD_P5_RF13"]
    );
    assert_eq!(get_mirac_a_flight_ids(&cat).len(), 4);
    assert_eq!(get_mirac_p_hatpro_flight_ids(&cat).len(), 4);
}

#[test]
fn test_reference_catalog_p5_flight_count() {
    let path = require_test_file!("flight-phase-separation");
    let cat = FlightCatalog::from_path(path).unwrap();
    let flights = cat.get_all_flights(&["ACLOUD", "AFLUX", "MOSAiC-ACA", "HALO-AC3"], &["P5"]);
    assert_eq!(flights.len(), 56);
}

//! Synthetic GPM L1C granules written with the HDF5 group layout of the
//! real product.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Datelike, TimeZone, Timelike, Utc};
use test_utils::{create_swath_geolocation, create_tb_swath};

pub const N_SCANS: usize = 6;
pub const N_PIXELS: usize = 4;

pub const HEADER: &str = "DOI=10.5067/GPM/MHS/NOAA18/1C/07;\nAlgorithmID=1CMHS;\nSatelliteName=NOAA18;\n";

/// Start of the first scan; scans follow every minute.
pub fn first_scan() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, 10, 10, 30, 0).unwrap()
}

/// Scans run north from 81N in 0.5 degree steps along the Greenwich
/// meridian, pixels 1 degree apart in longitude.
pub fn geolocation() -> (Vec<f32>, Vec<f32>) {
    let (lat, lon) = create_swath_geolocation(N_SCANS, N_PIXELS, 81.0, 0.5, 0.0, 1.0);
    (
        lat.into_iter().map(|v| v as f32).collect(),
        lon.into_iter().map(|v| v as f32).collect(),
    )
}

fn put_f32(group: &mut netcdf::GroupMut<'_>, name: &str, dims: &[&str], values: &[f32]) {
    let mut var = group.add_variable::<f32>(name, dims).unwrap();
    var.put_values(values, ..).unwrap();
}

fn put_i16(group: &mut netcdf::GroupMut<'_>, name: &str, dims: &[&str], values: &[i16]) {
    let mut var = group.add_variable::<i16>(name, dims).unwrap();
    var.put_values(values, ..).unwrap();
}

/// Brightness temperatures of one swath. Channel 0 of the last scan is a
/// flatline.
pub fn swath_tb(n_channels: usize) -> Vec<f32> {
    let mut tb = create_tb_swath(N_SCANS, N_PIXELS, n_channels);
    for pixel in 0..N_PIXELS {
        tb[((N_SCANS - 1) * N_PIXELS + pixel) * n_channels] = 250.0;
    }
    tb.into_iter().map(|v| v as f32).collect()
}

/// Write a granule with the given swaths and their channel counts.
pub fn write_granule(path: &Path, swaths: &[(&str, usize)]) {
    let mut file = netcdf::create(path).unwrap();
    let (lat, lon) = geolocation();
    let times: Vec<DateTime<Utc>> = (0..N_SCANS)
        .map(|i| first_scan() + Duration::minutes(i as i64))
        .collect();

    for (swath, n_channels) in swaths {
        let mut group = file.add_group(swath).unwrap();
        group.add_dimension("nscan", N_SCANS).unwrap();
        group.add_dimension("npixel", N_PIXELS).unwrap();
        group.add_dimension("nchannel", *n_channels).unwrap();
        group.add_dimension("nchUIA", 1).unwrap();

        put_f32(&mut group, "Latitude", &["nscan", "npixel"], &lat);
        put_f32(&mut group, "Longitude", &["nscan", "npixel"], &lon);
        put_f32(
            &mut group,
            "incidenceAngle",
            &["nscan", "npixel", "nchUIA"],
            &[52.8; N_SCANS * N_PIXELS],
        );
        let mut quality = vec![0i16; N_SCANS * N_PIXELS];
        quality[(N_SCANS - 1) * N_PIXELS] = 3;
        put_i16(&mut group, "Quality", &["nscan", "npixel"], &quality);
        put_f32(
            &mut group,
            "Tc",
            &["nscan", "npixel", "nchannel"],
            &swath_tb(*n_channels),
        );

        {
            let mut scan_time = group.add_group("ScanTime").unwrap();
            scan_time.add_dimension("nscan", N_SCANS).unwrap();
            let field = |f: fn(&DateTime<Utc>) -> i16| -> Vec<i16> { times.iter().map(f).collect() };
            put_i16(&mut scan_time, "Year", &["nscan"], &field(|t| t.year() as i16));
            put_i16(&mut scan_time, "Month", &["nscan"], &field(|t| t.month() as i16));
            put_i16(&mut scan_time, "DayOfMonth", &["nscan"], &field(|t| t.day() as i16));
            put_i16(&mut scan_time, "Hour", &["nscan"], &field(|t| t.hour() as i16));
            put_i16(&mut scan_time, "Minute", &["nscan"], &field(|t| t.minute() as i16));
            put_i16(&mut scan_time, "Second", &["nscan"], &field(|t| t.second() as i16));
            put_i16(&mut scan_time, "MilliSecond", &["nscan"], &[0; N_SCANS]);
        }

        {
            let mut status = group.add_group("SCstatus").unwrap();
            status.add_dimension("nscan", N_SCANS).unwrap();
            put_i16(&mut status, "SCorientation", &["nscan"], &[180; N_SCANS]);
            let sc_lat: Vec<f32> = (0..N_SCANS).map(|i| 80.0 + 0.5 * i as f32).collect();
            put_f32(&mut status, "SClatitude", &["nscan"], &sc_lat);
            put_f32(&mut status, "SClongitude", &["nscan"], &[1.5; N_SCANS]);
            put_f32(&mut status, "SCaltitude", &["nscan"], &[854.0; N_SCANS]);
        }
    }

    file.add_attribute("FileHeader", HEADER).unwrap();
}

pub const MHS_FILE: &str = "1C.NOAA18.MHS.XCAL2016-V.20150610-S103000-E103500.051812.V07A.HDF5";
pub const ATMS_FILE: &str = "1C.NPP.ATMS.XCAL2019-V.20150610-S103000-E103500.018710.V07A.HDF5";
pub const AMSR2_FILE: &str = "1C.GCOMW1.AMSR2.XCAL2016-V.20150610-S103000-E103500.016271.V07A.HDF5";

/// Archive directory with one MHS, ATMS and AMSR2 granule.
pub fn archive(dir: &Path) -> PathBuf {
    write_granule(&dir.join(MHS_FILE), &[("S1", 5)]);
    write_granule(
        &dir.join(ATMS_FILE),
        &[("S1", 1), ("S2", 1), ("S3", 1), ("S4", 6)],
    );
    write_granule(&dir.join(AMSR2_FILE), &[("S5", 2), ("S6", 2)]);
    dir.to_path_buf()
}

//! Reading swaths of a granule file.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{NaiveDate, TimeZone, Utc};
use lizard_common::time::{to_unix_seconds, UNIX_TIME_UNITS};
use lizard_common::{AttrValue, Attrs, Dataset, Variable};
use ndarray::{Array1, Array2, Array3, ArrayD, Axis, Ix1, Ix2, Ix3};
use netcdf_io::NcReader;
use tracing::{debug, info};

use crate::error::{GpmError, GpmResult};
use crate::index::{mask_to_indices, SpatialFilter};
use crate::instrument::Instrument;

/// Options shared by all swath readers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    /// Scan selection; `None` keeps every scan.
    pub filter: Option<SpatialFilter>,
    /// Add `footprint_id`, unique within the granule.
    pub add_index: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            filter: None,
            add_index: true,
        }
    }
}

impl ReadOptions {
    pub fn with_filter(filter: SpatialFilter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }
}

// ============================================================================
// Array access
// ============================================================================

fn read_array(reader: &NcReader, swath: &str, name: &str) -> GpmResult<ArrayD<f64>> {
    Ok(reader.variable(&format!("{}/{}", swath, name))?.data)
}

fn shape_error(name: &str, data: &ArrayD<f64>) -> GpmError {
    GpmError::InvalidShape {
        name: name.to_string(),
        shape: data.shape().to_vec(),
    }
}

fn read_1d(reader: &NcReader, swath: &str, name: &str) -> GpmResult<Array1<f64>> {
    let data = read_array(reader, swath, name)?;
    let err = shape_error(name, &data);
    data.into_dimensionality::<Ix1>().map_err(|_| err)
}

fn read_2d(reader: &NcReader, swath: &str, name: &str) -> GpmResult<Array2<f64>> {
    let data = read_array(reader, swath, name)?;
    let err = shape_error(name, &data);
    data.into_dimensionality::<Ix2>().map_err(|_| err)
}

fn read_3d(reader: &NcReader, swath: &str, name: &str) -> GpmResult<Array3<f64>> {
    let data = read_array(reader, swath, name)?;
    let err = shape_error(name, &data);
    data.into_dimensionality::<Ix3>().map_err(|_| err)
}

/// Footprint latitude and longitude of a swath, shape (scan, pixel).
pub(crate) fn read_geolocation(
    reader: &NcReader,
    swath: &str,
) -> GpmResult<(Array2<f64>, Array2<f64>)> {
    let lat = read_2d(reader, swath, "Latitude")?;
    let lon = read_2d(reader, swath, "Longitude")?;
    if lat.dim() != lon.dim() {
        return Err(GpmError::InvalidShape {
            name: "Longitude".to_string(),
            shape: lon.shape().to_vec(),
        });
    }
    Ok((lat, lon))
}

/// Scan times of a swath as unix seconds. Scans with invalid date fields
/// get NaN.
pub(crate) fn read_scan_time(reader: &NcReader, swath: &str) -> GpmResult<Vec<f64>> {
    let field = |name: &str| read_1d(reader, &format!("{}/ScanTime", swath), name);
    let year = field("Year")?;
    let month = field("Month")?;
    let day = field("DayOfMonth")?;
    let hour = field("Hour")?;
    let minute = field("Minute")?;
    let second = field("Second")?;
    let milli = field("MilliSecond")?;

    let n = year.len();
    for f in [&month, &day, &hour, &minute, &second, &milli] {
        if f.len() != n {
            return Err(GpmError::InvalidShape {
                name: "ScanTime".to_string(),
                shape: vec![f.len()],
            });
        }
    }

    Ok((0..n)
        .map(|i| {
            NaiveDate::from_ymd_opt(year[i] as i32, month[i] as u32, day[i] as u32)
                .and_then(|d| {
                    d.and_hms_milli_opt(
                        hour[i] as u32,
                        minute[i] as u32,
                        second[i] as u32,
                        milli[i] as u32,
                    )
                })
                .map(|t| to_unix_seconds(Utc.from_utc_datetime(&t)))
                .unwrap_or(f64::NAN)
        })
        .collect())
}

/// Parse the `FileHeader` attribute: `key=value;\n` records.
pub fn parse_file_header(header: &str) -> GpmResult<Attrs> {
    let mut records: Vec<&str> = header.split(";\n").collect();
    // the text after the last separator is not a record
    records.pop();

    let mut attrs = Attrs::new();
    for record in records {
        let mut parts = record.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts
            .next()
            .ok_or_else(|| GpmError::InvalidHeader(record.to_string()))?;
        attrs.insert(key.to_string(), AttrValue::from(value));
    }
    Ok(attrs)
}

// ============================================================================
// Swath readers
// ============================================================================

/// Read one granule file.
///
/// Geolocation, scan metadata and quality come from swath `sg`, brightness
/// temperatures from swath `st`. Both must have the same number of scans
/// and pixels; W- and G-band swaths share almost the same footprints.
pub fn read_swath_file(
    path: &Path,
    instrument: Instrument,
    sg: &str,
    st: &str,
    options: &ReadOptions,
) -> GpmResult<Dataset> {
    instrument.channels(sg)?;
    let channels = instrument.channels(st)?;

    let reader = NcReader::open(path)?;
    let (lat, lon) = read_geolocation(&reader, sg)?;
    let (n_scans, n_pixels) = lat.dim();

    let mask = match &options.filter {
        Some(filter) => filter.scan_mask(lat.view(), lon.view()),
        None => vec![true; n_scans],
    };
    let ix = mask_to_indices(&mask);

    let scan_time = read_scan_time(&reader, sg)?;
    let sc_orientation = read_1d(&reader, sg, "SCstatus/SCorientation")?;
    let sc_lat = read_1d(&reader, sg, "SCstatus/SClatitude")?;
    let sc_lon = read_1d(&reader, sg, "SCstatus/SClongitude")?;
    let sc_alt = read_1d(&reader, sg, "SCstatus/SCaltitude")?;
    let incidence = read_3d(&reader, sg, "incidenceAngle")?;
    let quality = read_2d(&reader, sg, "Quality")?;
    let tb = read_3d(&reader, st, "Tc")?;

    if tb.dim() != (n_scans, n_pixels, channels.len()) {
        return Err(GpmError::InvalidShape {
            name: format!("{}/Tc", st),
            shape: tb.shape().to_vec(),
        });
    }
    if scan_time.len() != n_scans || quality.dim() != (n_scans, n_pixels) {
        return Err(GpmError::InvalidShape {
            name: format!("{}/Quality", sg),
            shape: quality.shape().to_vec(),
        });
    }

    let along = |a: &Array1<f64>| Variable::from_vec("x", a.select(Axis(0), &ix).to_vec());
    let grid = |a: Array2<f64>| Variable::new(&["x", "y"], a.select(Axis(0), &ix).into_dyn());

    let mut ds = Dataset::new();
    ds.insert_coord(
        "x",
        Variable::from_vec("x", ix.iter().map(|i| *i as f64).collect()),
    )?;
    ds.insert_coord(
        "y",
        Variable::from_vec("y", (0..n_pixels).map(|i| i as f64).collect()),
    )?;
    ds.insert_coord(
        "channel",
        Variable::from_vec("channel", channels.iter().map(|c| *c as f64).collect()),
    )?;

    let scan_time: Vec<f64> = ix.iter().map(|i| scan_time[*i]).collect();
    ds.insert_var(
        "scan_time",
        Variable::from_vec("x", scan_time).with_attr("units", UNIX_TIME_UNITS),
    )?;
    ds.insert_var("sc_orientation", along(&sc_orientation))?;
    ds.insert_var("sc_lat", along(&sc_lat))?;
    ds.insert_var("sc_lon", along(&sc_lon))?;
    ds.insert_var("sc_alt", along(&sc_alt))?;
    ds.insert_var("lat", grid(lat)?)?;
    ds.insert_var("lon", grid(lon)?)?;
    ds.insert_var(
        "incidence_angle",
        grid(incidence.index_axis(Axis(2), 0).to_owned())?,
    )?;
    ds.insert_var("quality", grid(quality)?)?;
    ds.insert_var(
        "tb",
        Variable::new(&["x", "y", "channel"], tb.select(Axis(0), &ix).into_dyn())?,
    )?;

    if options.add_index {
        let ids: Vec<f64> = ix
            .iter()
            .flat_map(|x| (0..n_pixels).map(move |y| (x * n_pixels + y) as f64))
            .collect();
        let footprint_id = Variable::from_shape_vec(&["x", "y"], &[ix.len(), n_pixels], ids)?
            .with_attr("standard_name", "footprint_id")
            .with_attr("long_name", "footprint id")
            .with_attr(
                "description",
                "unique footprint id within granule defined by counting first the \
                 across-track (y) values for each along-track (x) bin",
            );
        ds.insert_var("footprint_id", footprint_id)?;
    }

    ds.attrs = parse_file_header(&reader.global_str_attr("FileHeader")?)?;

    debug!(
        file = %path.display(),
        geolocation = sg,
        tb = st,
        n_scans = ix.len(),
        total_scans = n_scans,
        "Read GPM L1C swath"
    );
    Ok(ds)
}

/// Read the W- and G-band channels of a granule as one dataset.
///
/// * MHS: swath S1.
/// * ATMS and SSMIS: the brightness temperatures of the second swath are
///   placed on the geolocation of the first.
/// * AMSR2: A and B scans are concatenated along `x`; `x` and
///   `footprint_id` of the B scan are negated.
///
/// Channels are finally ordered by [`Instrument::channels_sorted`].
pub fn read_file(path: &Path, instrument: Instrument, options: &ReadOptions) -> GpmResult<Dataset> {
    let swaths = instrument.wg_swaths();
    let ds = match instrument {
        Instrument::Mhs => read_swath_file(path, instrument, swaths[0], swaths[0], options)?,
        Instrument::Atms | Instrument::Ssmis => {
            let ds1 = read_swath_file(path, instrument, swaths[0], swaths[0], options)?;
            let ds2 = read_swath_file(path, instrument, swaths[0], swaths[1], options)?;
            Dataset::concat(&[ds1, ds2], "channel")?
        }
        Instrument::Amsr2 => {
            let ds1 = read_swath_file(path, instrument, swaths[0], swaths[0], options)?;
            let mut ds2 = read_swath_file(path, instrument, swaths[1], swaths[1], options)?;
            for name in ["x", "footprint_id"] {
                if let Some(var) = ds2.get_mut(name) {
                    var.data.mapv_inplace(|v| -v);
                }
            }
            Dataset::concat(&[ds1, ds2], "x")?
        }
    };

    let sorted: Vec<f64> = instrument
        .channels_sorted()
        .iter()
        .map(|c| *c as f64)
        .collect();
    let ds = ds.sel("channel", &sorted)?;

    info!(
        file = %path.display(),
        instrument = %instrument,
        n_scans = ds.dim_len("x").unwrap_or(0),
        "Read GPM L1C granule"
    );
    Ok(ds)
}

/// Read every swath of a granule, keyed by swath name.
pub fn read_all_swaths(
    path: &Path,
    instrument: Instrument,
    options: &ReadOptions,
) -> GpmResult<BTreeMap<String, Dataset>> {
    let mut out = BTreeMap::new();
    for (swath, _) in instrument.swath_channels() {
        let ds = read_swath_file(path, instrument, swath, swath, options)?;
        out.insert(swath.to_string(), ds);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_header() {
        let header = "DOI=10.5067/GPM/MHS/NOAA18/1C/07;\nDOIauthority=http://dx.doi.org/;\nAlgorithmID=1CMHS;\n";
        let attrs = parse_file_header(header).unwrap();
        assert_eq!(attrs.len(), 3);
        assert_eq!(
            attrs.get("AlgorithmID").and_then(AttrValue::as_str),
            Some("1CMHS")
        );
        assert_eq!(
            attrs.get("DOIauthority").and_then(AttrValue::as_str),
            Some("http://dx.doi.org/")
        );
    }

    #[test]
    fn test_parse_file_header_drops_trailing_text() {
        let attrs = parse_file_header("A=1;\nB=2").unwrap();
        assert_eq!(attrs.len(), 1);
        assert!(parse_file_header("A;\n").is_err());
    }
}

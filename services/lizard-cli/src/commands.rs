//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Args;
use flight_meta::FlightCatalog;
use gpm_l1c::{flag_gpml1c, GpmL1c, Instrument, ReadOptions, SpatialFilter, TimeFilter};
use lizard_common::time::parse_iso8601;
use lizard_common::{DataPaths, RegionOfInterest, TimeWindow};
use tracing::info;

/// Spatial selection shared by `granules` and `read-gpm`.
#[derive(Args, Debug)]
pub struct SpatialArgs {
    /// Region "lon0,lon1,lat0,lat1"
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    roi: Option<String>,

    /// Center latitude of a distance filter
    #[arg(long, requires = "lon")]
    lat: Option<f64>,

    /// Center longitude of a distance filter
    #[arg(long, requires = "lat")]
    lon: Option<f64>,

    /// Maximum distance to the center in meters
    #[arg(long, default_value_t = 100_000.0)]
    max_distance: f64,
}

impl SpatialArgs {
    fn filter(&self) -> Result<Option<SpatialFilter>> {
        if let Some(roi) = &self.roi {
            let roi: RegionOfInterest = roi.parse()?;
            return Ok(Some(SpatialFilter::Roi(roi)));
        }
        Ok(match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(SpatialFilter::distance(lat, lon, self.max_distance)),
            _ => None,
        })
    }
}

#[derive(Args, Debug)]
pub struct GranulesArgs {
    /// Instruments (MHS, ATMS, SSMIS, AMSR2); all if omitted
    #[arg(short, long)]
    instrument: Vec<String>,

    /// Satellites; all carrying the instrument if omitted
    #[arg(short, long)]
    satellite: Vec<String>,

    /// Orbits starting on this date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "time")]
    date: Option<NaiveDate>,

    /// Center of a time window (ISO 8601)
    #[arg(long)]
    time: Option<String>,

    /// Half width of the time window in minutes
    #[arg(long, default_value_t = 30)]
    offset_minutes: i64,

    #[command(flatten)]
    spatial: SpatialArgs,
}

#[derive(Args, Debug)]
pub struct ReadGpmArgs {
    #[arg(short, long)]
    instrument: String,

    #[arg(short, long)]
    satellite: String,

    /// Granule number, e.g. 038575
    #[arg(short, long)]
    granule: String,

    /// Set flagged brightness temperatures to NaN
    #[arg(long)]
    flag: bool,

    /// Write the swath to this NetCDF file instead of printing a summary
    #[arg(short, long)]
    output: Option<String>,

    #[command(flatten)]
    spatial: SpatialArgs,
}

#[derive(Args, Debug)]
pub struct SegmentsArgs {
    /// Flight segment YAML file or directory
    #[arg(long, env = "LIZARD_FLIGHT_SEGMENTS")]
    catalog: String,

    /// Research flight, e.g. ACLOUD_P5_RF04
    flight_id: String,

    /// Only vertical profiles
    #[arg(long)]
    profiles: bool,
}

#[derive(Args, Debug)]
pub struct FlightsArgs {
    /// Flight segment YAML file or directory
    #[arg(long, env = "LIZARD_FLIGHT_SEGMENTS")]
    catalog: String,

    #[arg(short, long)]
    mission: Vec<String>,

    #[arg(short, long)]
    platform: Vec<String>,

    /// Only flights on this date
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn data_paths(config: Option<&str>) -> Result<DataPaths> {
    let paths = match config {
        Some(file) => DataPaths::from_yaml(file)
            .with_context(|| format!("Failed to load configuration from {}", file))?,
        None => DataPaths::from_env().context("Failed to load data paths from environment")?,
    };
    Ok(paths)
}

fn time_filter(args: &GranulesArgs) -> Result<TimeFilter> {
    match (&args.date, &args.time) {
        (Some(date), _) => Ok(TimeFilter::Date(*date)),
        (None, Some(time)) => {
            let center = parse_iso8601(time)?;
            Ok(TimeFilter::Window(TimeWindow::new(
                center,
                Duration::minutes(args.offset_minutes),
            )))
        }
        (None, None) => bail!("Either --date or --time is required"),
    }
}

pub fn granules(config: Option<&str>, args: &GranulesArgs) -> Result<()> {
    let archive = GpmL1c::from_paths(&data_paths(config)?);
    let time = time_filter(args)?;
    let Some(spatial) = args.spatial.filter()? else {
        bail!("Either --roi or --lat/--lon is required");
    };

    let instruments: Vec<Instrument> = if args.instrument.is_empty() {
        Instrument::ALL.to_vec()
    } else {
        args.instrument
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()?
    };

    let mut sat_ins = Vec::new();
    for instrument in &instruments {
        for satellite in instrument.satellites() {
            if args.satellite.is_empty() || args.satellite.iter().any(|s| s == satellite) {
                sat_ins.push((satellite, *instrument));
            }
        }
    }

    let granules = archive.get_granules(&sat_ins, &time, &spatial)?;
    info!(
        combinations = granules.len(),
        granules = granules.values().map(Vec::len).sum::<usize>(),
        "Granule search finished"
    );
    println!("{}", serde_json::to_string_pretty(&granules)?);
    Ok(())
}

pub fn read_gpm(config: Option<&str>, args: &ReadGpmArgs) -> Result<()> {
    let archive = GpmL1c::from_paths(&data_paths(config)?);
    let instrument: Instrument = args.instrument.parse()?;
    let options = ReadOptions {
        filter: args.spatial.filter()?,
        ..ReadOptions::default()
    };

    let mut ds = archive.read(instrument, &args.satellite, &args.granule, &options)?;
    if args.flag {
        let (flagged, report) = flag_gpml1c(&ds, true)?;
        info!(removed = report.n_removed, "Flagged brightness temperatures");
        ds = flagged;
    }

    match &args.output {
        Some(path) => {
            netcdf_io::write_dataset(&ds, path)?;
            info!(file = %path, "Wrote swath");
        }
        None => println!("{}", ds),
    }
    Ok(())
}

pub fn segments(args: &SegmentsArgs) -> Result<()> {
    let catalog = FlightCatalog::from_path(&args.catalog)?;
    if args.profiles {
        for segment in catalog.profiles(&args.flight_id)? {
            let id = segment.segment_id.as_deref().unwrap_or("-");
            println!("{}\t{}\t{}", id, segment.start, segment.end);
        }
    } else {
        for line in catalog.segment_listing(&args.flight_id)? {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn flights(args: &FlightsArgs) -> Result<()> {
    let catalog = FlightCatalog::from_path(&args.catalog)?;
    let mut ids = catalog.get_all_flights(&args.mission, &args.platform);
    if let Some(day) = args.date {
        let on_day = catalog.flights_of_day(day);
        ids.retain(|id| on_day.contains(id));
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

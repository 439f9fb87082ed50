//! In-memory flight segment catalog.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use lizard_common::Dataset;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{FlightError, FlightResult};
use crate::flight::{Flight, FlightId, Segment};

type PlatformMap = BTreeMap<String, BTreeMap<String, Flight>>;

/// Flight metadata nested as mission → platform → flight id.
#[derive(Debug, Clone, Default)]
pub struct FlightCatalog {
    missions: BTreeMap<String, PlatformMap>,
}

impl FlightCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load flight segments from a path.
    ///
    /// A directory is searched recursively for `*.yaml`/`*.yml` files, each
    /// holding one flight (the ac3airborne layout
    /// `MISSION/PLATFORM/FLIGHT_ID.yaml`). A single file must hold the
    /// nested mission → platform → flight id mapping.
    pub fn from_path<P: AsRef<Path>>(path: P) -> FlightResult<Self> {
        let path = path.as_ref();
        let catalog = if path.is_dir() {
            Self::from_dir(path)?
        } else {
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml_str(&content).map_err(|e| FlightError::Load {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };
        info!(
            path = %path.display(),
            flights = catalog.len(),
            "Loaded flight segments"
        );
        Ok(catalog)
    }

    /// Parse the nested mapping form.
    pub fn from_yaml_str(content: &str) -> FlightResult<Self> {
        let missions: BTreeMap<String, PlatformMap> = serde_yaml::from_str(content)?;
        Ok(Self { missions })
    }

    fn from_dir(dir: &Path) -> FlightResult<Self> {
        let mut catalog = Self::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yaml" || e == "yml")
                .unwrap_or(false);
            if !entry.file_type().is_file() || !is_yaml {
                continue;
            }

            let content = std::fs::read_to_string(path)?;
            match serde_yaml::from_str::<Flight>(&content) {
                Ok(flight) => catalog.insert(flight),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable flight file")
                }
            }
        }
        Ok(catalog)
    }

    /// Add or replace a flight.
    pub fn insert(&mut self, flight: Flight) {
        debug!(flight_id = %flight.flight_id, "Adding flight");
        self.missions
            .entry(flight.mission.clone())
            .or_default()
            .entry(flight.platform.clone())
            .or_default()
            .insert(flight.flight_id.clone(), flight);
    }

    /// Number of flights.
    pub fn len(&self) -> usize {
        self.flights().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All flights in mission, platform, flight id order.
    pub fn flights(&self) -> impl Iterator<Item = &Flight> {
        self.missions
            .values()
            .flat_map(|platforms| platforms.values())
            .flat_map(|flights| flights.values())
    }

    /// Metadata of a flight.
    pub fn meta(&self, flight_id: &str) -> FlightResult<&Flight> {
        let id: FlightId = flight_id.parse()?;
        self.missions
            .get(&id.mission)
            .and_then(|p| p.get(&id.platform))
            .and_then(|f| f.get(flight_id))
            .ok_or_else(|| FlightError::FlightNotFound(flight_id.to_string()))
    }

    pub fn segments_plain(&self, flight_id: &str) -> FlightResult<Vec<&Segment>> {
        Ok(self.meta(flight_id)?.segments_plain())
    }

    pub fn segments_dict(&self, flight_id: &str) -> FlightResult<BTreeMap<String, &Segment>> {
        Ok(self.meta(flight_id)?.segments_dict())
    }

    /// Look up a segment (or part) by its id.
    pub fn segment(&self, segment_id: &str) -> FlightResult<&Segment> {
        let flight_id = FlightId::of_segment(segment_id)?;
        self.meta(&flight_id.to_string())?
            .segments_dict()
            .remove(segment_id)
            .ok_or_else(|| FlightError::SegmentNotFound(segment_id.to_string()))
    }

    /// Start and end of a segment.
    pub fn segment_times(&self, segment_id: &str) -> FlightResult<(DateTime<Utc>, DateTime<Utc>)> {
        let segment = self.segment(segment_id)?;
        Ok((segment.start, segment.end))
    }

    /// Cut a dataset with a `time` coordinate (unix seconds) to a segment,
    /// edges included.
    pub fn segment_slice(&self, ds: &Dataset, segment_id: &str) -> FlightResult<Dataset> {
        let (start, end) = self.segment(segment_id)?.unix_bounds();
        let indices = ds.range_indices("time", start, end)?;
        Ok(ds.isel("time", &indices))
    }

    /// Keep only the time steps inside segments that have none of the
    /// given kinds. Segments are concatenated in flight order, so
    /// overlapping segments repeat time steps. `None` when no segment is
    /// left.
    pub fn remove_segments<S: AsRef<str>>(
        &self,
        ds: &Dataset,
        flight_id: &str,
        kinds: &[S],
    ) -> FlightResult<Option<Dataset>> {
        let times = ds.values("time")?;
        let kept: Vec<&Segment> = self
            .segments_plain(flight_id)?
            .into_iter()
            .filter(|s| !s.has_any_kind(kinds))
            .collect();
        if kept.is_empty() {
            return Ok(None);
        }

        let indices: Vec<usize> = kept.iter().flat_map(|s| s.indices(&times)).collect();
        Ok(Some(ds.isel("time", &indices)))
    }

    /// Printable listing of the top-level segments of a flight.
    pub fn segment_listing(&self, flight_id: &str) -> FlightResult<Vec<String>> {
        Ok(self.meta(flight_id)?.segment_listing())
    }

    pub fn profiles(&self, flight_id: &str) -> FlightResult<Vec<&Segment>> {
        Ok(self.meta(flight_id)?.profiles())
    }

    /// Flight ids that took place on a day.
    pub fn flights_of_day(&self, day: NaiveDate) -> Vec<String> {
        self.flights()
            .filter(|f| f.date == day)
            .map(|f| f.flight_id.clone())
            .collect()
    }

    pub fn day_of_flight(&self, flight_id: &str) -> FlightResult<NaiveDate> {
        Ok(self.meta(flight_id)?.date)
    }

    /// Research flights of the given missions and platforms.
    ///
    /// Flight ids are sorted by mission, platform and then flight id, not
    /// in the order of the catalog files or of the arguments. Flight
    /// numbers are zero-padded (`RF02`, `RF10`), so within one platform
    /// this is the chronological order. The HALO-AC3 HALO test flight
    /// (RF00) and transfer flight (RF01) are never returned.
    pub fn get_all_flights<S: AsRef<str>, T: AsRef<str>>(
        &self,
        missions: &[S],
        platforms: &[T],
    ) -> Vec<String> {
        self.missions
            .iter()
            .filter(|(m, _)| missions.iter().any(|x| x.as_ref() == m.as_str()))
            .flat_map(|(_, p)| p.iter())
            .filter(|(p, _)| platforms.iter().any(|x| x.as_ref() == p.as_str()))
            .flat_map(|(_, f)| f.keys())
            .filter(|id| !matches!(id.as_str(), "HALO-AC3_HALO_RF00" | "HALO-AC3_HALO_RF01"))
            .cloned()
            .collect()
    }
}

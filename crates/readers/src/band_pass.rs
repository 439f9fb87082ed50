//! Channel pass bands from RTTOV microwave filter files.
//!
//! Each channel takes two records:
//!
//! ```text
//! <channel> <polarization> <n_if_offsets> <bandwidth MHz>
//! <center GHz> [<offset 1 GHz> [<offset 2 GHz>]]
//! ```
//!
//! `n_if_offsets` is 0 for a single pass band, 1 for two and 2 for four
//! side bands. Filter files live in
//! `$PATH_SEC/data/sat/mw_overview/filter_files/<acronym>.flt`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use lizard_common::{DataPaths, Dataset, Variable};
use ndarray::Array2;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ReaderError, ReaderResult};

const FILTER_DIR: &str = "data/sat/mw_overview/filter_files";

/// RTTOV acronym of instruments whose filter file does not depend on the
/// satellite.
const ACRONYMS: [(&str, &str); 41] = [
    ("AltiKa", "altika"),
    ("AMR", "amr"),
    ("AMR-C", "amrc"),
    ("AMSR2", "amsr2"),
    ("AMSR-E", "amsre"),
    ("AMSU-A", "amsua"),
    ("AMSU-B", "amsub"),
    ("ATMS", "atms"),
    ("AWS", "aws"),
    ("COWVR", "cowvr"),
    ("CPR", "cpr"),
    ("DPR", "dpr"),
    ("GMI", "gmi"),
    ("HSB", "hsb"),
    ("ICI", "ici"),
    ("MADRAS", "madras"),
    ("MHS", "mhs"),
    ("MIRAS", "miras"),
    ("MSU", "msu"),
    ("MTVZA-GY", "mtvzagy"),
    ("MWHS-1", "mwhs"),
    ("MWHS-2", "mwhs2"),
    ("MWI", "mwi"),
    ("MWR", "mwr"),
    ("MWS", "mws"),
    ("MWTS-1", "mwts"),
    ("MWTS-2", "mwts2"),
    ("NEMS", "nems"),
    ("POLSIR", "polsir"),
    ("SAPHIR", "saphir"),
    ("SCAMS", "scams"),
    ("SMMR", "smmr"),
    ("SSM/I", "ssmi"),
    ("SSM/T-2", "ssmt2"),
    ("TMI", "tmi"),
    ("TMS", "tropics"),
    ("WindSat", "windsat"),
    ("MiRAC-A", "miraca"),
    ("MiRAC-P", "miracp"),
    ("HATPRO", "hatpro"),
    ("HAMP", "hamp"),
];

/// Instruments with satellite specific filter files.
const SATELLITE_ACRONYMS: [(&str, &str, &str); 14] = [
    ("ESMR", "Nimbus-5", "esmr_n5"),
    ("ESMR", "Nimbus-6", "esmr_n6"),
    ("MWRI", "HY-2A", "hy2mwri"),
    ("MWRI", "HY-2B", "hy2mwri"),
    ("MWRI", "FY-3A", "mwri"),
    ("MWRI", "FY-3B", "mwri"),
    ("MWRI", "FY-3C", "mwri"),
    ("MWRI", "FY-3D", "mwri"),
    ("MWRI", "FY-3F", "mwri"),
    ("MWRI", "FY-3H", "mwri"),
    ("SSMIS", "DMSP-F16", "ssmis-dmsp16only"),
    ("SSMIS", "DMSP-F17", "ssmis-notdmsp16"),
    ("SSMIS", "DMSP-F18", "ssmis-notdmsp16"),
    ("SSMIS", "DMSP-F19", "ssmis-notdmsp16"),
];

const POLARIZATION_FLAG_MEANINGS: &str = "average_vertical_horizontal \
nominal_vertical_at_nadir_rotating nominal_horizontal_at_nadir_rotating \
vertical horizontal +45_minus_-45 left_circular_minus_right_circular uneven_mixture";

/// RTTOV filter file acronym of an instrument (WMO OSCAR names). ESMR,
/// MWRI and SSMIS need the satellite as well.
pub fn rttov_acronym(instrument: &str, satellite: Option<&str>) -> ReaderResult<&'static str> {
    if let Some((_, acronym)) = ACRONYMS.iter().find(|(name, _)| *name == instrument) {
        return Ok(*acronym);
    }

    let candidates: Vec<&(&str, &str, &str)> = SATELLITE_ACRONYMS
        .iter()
        .filter(|(name, _, _)| *name == instrument)
        .collect();
    if candidates.is_empty() {
        return Err(ReaderError::UnknownInstrument(instrument.to_string()));
    }

    let satellite = satellite.unwrap_or("unspecified");
    candidates
        .iter()
        .find(|(_, sat, _)| *sat == satellite)
        .map(|(_, _, acronym)| *acronym)
        .ok_or_else(|| ReaderError::UnknownSatellite {
            instrument: instrument.to_string(),
            satellite: satellite.to_string(),
            expected: candidates
                .iter()
                .map(|(_, sat, _)| *sat)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Channel polarization as coded in the filter files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChannelPolarization {
    /// 0.5 (V + H)
    Average,
    QuasiVertical,
    QuasiHorizontal,
    Vertical,
    Horizontal,
    S3,
    S4,
    /// Channel specific mixture of V and H
    Mixed,
}

impl ChannelPolarization {
    pub fn from_code(code: u8) -> Option<Self> {
        use ChannelPolarization::*;
        [Average, QuasiVertical, QuasiHorizontal, Vertical, Horizontal, S3, S4, Mixed]
            .get(code as usize)
            .copied()
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Short label used in channel descriptions.
    pub fn short(&self) -> &'static str {
        match self {
            ChannelPolarization::Average => "VH",
            ChannelPolarization::QuasiVertical => "QV",
            ChannelPolarization::QuasiHorizontal => "QH",
            ChannelPolarization::Vertical => "V",
            ChannelPolarization::Horizontal => "H",
            ChannelPolarization::S3 => "S3",
            ChannelPolarization::S4 => "S4",
            ChannelPolarization::Mixed => "xVH",
        }
    }
}

impl fmt::Display for ChannelPolarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub channel: u32,
    pub polarization: ChannelPolarization,
    pub n_if_offsets: u8,
    /// Bandwidth of each pass band (MHz)
    pub bandwidth: f64,
    /// GHz
    pub center_freq: f64,
    pub if_offset_1: f64,
    pub if_offset_2: f64,
}

impl Channel {
    /// The four frequencies averaged for this channel:
    /// `center ∓ offset 1 ∓ offset 2`. Single pass band channels repeat the
    /// center frequency.
    pub fn avg_freq(&self) -> [f64; 4] {
        let (c, o1, o2) = (self.center_freq, self.if_offset_1, self.if_offset_2);
        [c - o1 - o2, c - o1 + o2, c + o1 - o2, c + o1 + o2]
    }

    /// Label such as `183.31±7 GHz`. Unknown side band counts give an
    /// empty label.
    pub fn label(&self) -> String {
        match self.n_if_offsets {
            0 => format!("{} GHz", self.center_freq),
            1 => format!("{}±{} GHz", self.center_freq, self.if_offset_1),
            2 => format!(
                "{}±{}±{} GHz",
                self.center_freq, self.if_offset_1, self.if_offset_2
            ),
            n => {
                warn!(channel = self.channel, n_if_offsets = n, "n_if_offsets not in [0, 1, 2]");
                String::new()
            }
        }
    }

    /// Label with polarization, e.g. `89 (V) GHz`.
    pub fn label_pol(&self) -> String {
        self.label()
            .replace("GHz", &format!("({}) GHz", self.polarization))
    }
}

/// Pass bands of all channels of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandPass {
    pub instrument: String,
    pub platform: String,
    pub channels: Vec<Channel>,
}

impl BandPass {
    /// Parse the filter file content. Blank lines are skipped.
    pub fn parse(content: &str, source: &str) -> ReaderResult<Vec<Channel>> {
        let parse_err = |line: usize, message: String| ReaderError::Parse {
            path: source.to_string(),
            line,
            message,
        };

        let records: Vec<(usize, Vec<&str>)> = content
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.split_whitespace().collect::<Vec<_>>()))
            .filter(|(_, fields)| !fields.is_empty())
            .collect();

        let mut channels = Vec::with_capacity(records.len() / 2);
        for pair in records.chunks(2) {
            let [(line1, head), (line2, freqs)] = pair else {
                let (line, _) = &pair[0];
                return Err(parse_err(*line, "channel without frequency record".into()));
            };
            if head.len() < 4 || freqs.is_empty() {
                return Err(parse_err(*line1, "too few fields".into()));
            }

            let int = |line: usize, s: &str| -> ReaderResult<u32> {
                s.parse().map_err(|_| parse_err(line, format!("expected integer, got '{}'", s)))
            };
            let float = |line: usize, s: &str| -> ReaderResult<f64> {
                s.parse().map_err(|_| parse_err(line, format!("expected number, got '{}'", s)))
            };

            let code = int(*line1, head[1])?;
            let polarization = u8::try_from(code)
                .ok()
                .and_then(ChannelPolarization::from_code)
                .ok_or_else(|| parse_err(*line1, format!("unknown polarization {}", code)))?;

            channels.push(Channel {
                channel: int(*line1, head[0])?,
                polarization,
                n_if_offsets: int(*line1, head[2])? as u8,
                bandwidth: float(*line1, head[3])?,
                center_freq: float(*line2, freqs[0])?,
                if_offset_1: freqs.get(1).map(|s| float(*line2, s)).transpose()?.unwrap_or(0.0),
                if_offset_2: freqs.get(2).map(|s| float(*line2, s)).transpose()?.unwrap_or(0.0),
            });
        }
        Ok(channels)
    }

    /// Filter file of an instrument below `$PATH_SEC`.
    pub fn filter_path(paths: &DataPaths, instrument: &str, satellite: Option<&str>) -> ReaderResult<PathBuf> {
        let acronym = rttov_acronym(instrument, satellite)?;
        Ok(paths.path_sec.join(FILTER_DIR).join(format!("{}.flt", acronym)))
    }

    pub fn from_file(path: &Path, instrument: &str, satellite: Option<&str>) -> ReaderResult<Self> {
        if !path.is_file() {
            return Err(ReaderError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let channels = Self::parse(&content, &path.display().to_string())?;
        debug!(file = %path.display(), channels = channels.len(), "Read band pass");
        Ok(Self {
            instrument: instrument.to_string(),
            platform: satellite.unwrap_or("unspecified").to_string(),
            channels,
        })
    }

    /// Read the filter file of an instrument, e.g. `("SSMIS", Some("DMSP-F18"))`.
    pub fn read(paths: &DataPaths, instrument: &str, satellite: Option<&str>) -> ReaderResult<Self> {
        let path = Self::filter_path(paths, instrument, satellite)?;
        Self::from_file(&path, instrument, satellite)
    }

    /// Two instruments on one platform, e.g. MiRAC-A and MiRAC-P. Channels
    /// of the second are numbered after those of the first.
    pub fn combine(first: &BandPass, second: &BandPass) -> Self {
        let offset = first.channels.len() as u32;
        let mut channels = first.channels.clone();
        channels.extend(second.channels.iter().map(|c| Channel {
            channel: c.channel + offset,
            ..c.clone()
        }));
        Self {
            instrument: format!("{} and {}", first.instrument, second.instrument),
            platform: first.platform.clone(),
            channels,
        }
    }

    pub fn channel(&self, number: u32) -> Option<&Channel> {
        self.channels.iter().find(|c| c.channel == number)
    }

    pub fn labels(&self) -> Vec<String> {
        self.channels.iter().map(Channel::label).collect()
    }

    pub fn labels_pol(&self) -> Vec<String> {
        self.channels.iter().map(Channel::label_pol).collect()
    }

    /// Numeric pass band data on a `channel` axis. With `calc_avg` the
    /// averaged frequencies are added on `(channel, n_avg_freq)`.
    pub fn to_dataset(&self, calc_avg: bool) -> ReaderResult<Dataset> {
        let column = |f: &dyn Fn(&Channel) -> f64| -> Vec<f64> { self.channels.iter().map(f).collect() };

        let mut ds = Dataset::new();
        ds.insert_coord(
            "channel",
            Variable::from_vec("channel", column(&|c| c.channel as f64)).with_attr("long_name", "channel number"),
        )?;
        ds.insert_var(
            "polarization",
            Variable::from_vec("channel", column(&|c| c.polarization.code() as f64))
                .with_attr("long_name", "polarization")
                .with_attr("flag_values", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
                .with_attr("flag_meanings", POLARIZATION_FLAG_MEANINGS),
        )?;
        ds.insert_var(
            "n_if_offsets",
            Variable::from_vec("channel", column(&|c| c.n_if_offsets as f64))
                .with_attr("long_name", "Number of intermediate frequency offsets"),
        )?;
        ds.insert_var(
            "bandwidth",
            Variable::from_vec("channel", column(&|c| c.bandwidth)).with_attr("units", "MHz"),
        )?;
        ds.insert_var(
            "center_freq",
            Variable::from_vec("channel", column(&|c| c.center_freq)).with_attr("units", "GHz"),
        )?;
        ds.insert_var(
            "if_offset_1",
            Variable::from_vec("channel", column(&|c| c.if_offset_1)).with_attr("units", "GHz"),
        )?;
        ds.insert_var(
            "if_offset_2",
            Variable::from_vec("channel", column(&|c| c.if_offset_2)).with_attr("units", "GHz"),
        )?;

        if calc_avg {
            let n = self.channels.len();
            let avg = Array2::from_shape_fn((n, 4), |(i, j)| self.channels[i].avg_freq()[j]);
            ds.insert_coord("n_avg_freq", Variable::from_vec("n_avg_freq", vec![1.0, 2.0, 3.0, 4.0]))?;
            ds.insert_var(
                "avg_freq",
                Variable::new(&["channel", "n_avg_freq"], avg.into_dyn())?
                    .with_attr("units", "GHz")
                    .with_attr("description", "Frequencies, which are averaged."),
            )?;
        }

        ds.attrs.insert("title".into(), "Pass band data for MW coefficient files".into());
        ds.attrs.insert("instrument".into(), self.instrument.clone().into());
        ds.attrs.insert("platform".into(), self.platform.clone().into());
        ds.attrs.insert("history".into(), "Created from RTTOV MW coefficient files".into());
        Ok(ds)
    }
}

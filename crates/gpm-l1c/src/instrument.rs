//! Instruments, satellites and their swath layouts.
//!
//! Swath channel numbers follow the L1C ATBD (v1.9, GPM V07):
//!
//! | instrument | swath | channels |
//! |---|---|---|
//! | MHS | S1 | 1-5 (89V, 157V, 183±1H, 183±3H, 190V) |
//! | ATMS | S1-S4 | 1; 2; 16; 17-22 |
//! | SSMIS | S1-S4 | 13 12 14; 16 15; 8 11 10 9; 17 18 |
//! | AMSR2 | S1-S6 | 5 6; 7 8; 9 10; 11 12; 13 14 (A scan); 13 14 (B scan) |

use std::fmt;
use std::str::FromStr;

use crate::error::{GpmError, GpmResult};

/// Passive microwave radiometers with an L1C product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instrument {
    Mhs,
    Atms,
    Ssmis,
    Amsr2,
}

const FILENAME_SAT: [(Instrument, &str, &str); 12] = [
    (Instrument::Atms, "SNPP", "NPP.ATMS"),
    (Instrument::Atms, "NOAA-21", "NOAA21.ATMS"),
    (Instrument::Atms, "NOAA-20", "NOAA20.ATMS"),
    (Instrument::Mhs, "NOAA-19", "NOAA19.MHS"),
    (Instrument::Mhs, "NOAA-18", "NOAA18.MHS"),
    (Instrument::Mhs, "Metop-C", "METOPC.MHS"),
    (Instrument::Mhs, "Metop-B", "METOPB.MHS"),
    (Instrument::Mhs, "Metop-A", "METOPA.MHS"),
    (Instrument::Ssmis, "DMSP-F18", "F18.SSMIS"),
    (Instrument::Ssmis, "DMSP-F17", "F17.SSMIS"),
    (Instrument::Ssmis, "DMSP-F16", "F16.SSMIS"),
    (Instrument::Amsr2, "GCOM-W", "GCOMW1.AMSR2"),
];

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::Mhs,
        Instrument::Atms,
        Instrument::Ssmis,
        Instrument::Amsr2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Mhs => "MHS",
            Instrument::Atms => "ATMS",
            Instrument::Ssmis => "SSMIS",
            Instrument::Amsr2 => "AMSR2",
        }
    }

    /// Swaths and their channels in file order.
    pub fn swath_channels(&self) -> &'static [(&'static str, &'static [u32])] {
        match self {
            Instrument::Mhs => &[("S1", &[1, 2, 3, 4, 5])],
            Instrument::Atms => &[
                ("S1", &[1]),
                ("S2", &[2]),
                ("S3", &[16]),
                ("S4", &[17, 18, 19, 20, 21, 22]),
            ],
            Instrument::Ssmis => &[
                ("S1", &[13, 12, 14]),
                ("S2", &[16, 15]),
                ("S3", &[8, 11, 10, 9]),
                ("S4", &[17, 18]),
            ],
            Instrument::Amsr2 => &[
                ("S1", &[5, 6]),
                ("S2", &[7, 8]),
                ("S3", &[9, 10]),
                ("S4", &[11, 12]),
                ("S5", &[13, 14]),
                ("S6", &[13, 14]),
            ],
        }
    }

    /// Channels of one swath.
    pub fn channels(&self, swath: &str) -> GpmResult<&'static [u32]> {
        self.swath_channels()
            .iter()
            .find(|(s, _)| *s == swath)
            .map(|(_, c)| *c)
            .ok_or_else(|| GpmError::UnknownSwath {
                instrument: self.name().to_string(),
                swath: swath.to_string(),
            })
    }

    /// W- and G-band channels sorted by frequency, V before H polarization
    /// and 183 GHz channels from the line center outward.
    pub fn channels_sorted(&self) -> &'static [u32] {
        match self {
            Instrument::Atms => &[16, 17, 18, 19, 20, 21, 22],
            Instrument::Mhs => &[1, 2, 3, 4, 5],
            Instrument::Ssmis => &[17, 18, 8, 9, 10, 11],
            Instrument::Amsr2 => &[13, 14],
        }
    }

    /// W- and G-band swaths; the first one holds the W-band channels and
    /// provides the geolocation of merged products.
    pub fn wg_swaths(&self) -> &'static [&'static str] {
        match self {
            Instrument::Mhs => &["S1"],
            Instrument::Atms => &["S3", "S4"],
            Instrument::Ssmis => &["S4", "S3"],
            Instrument::Amsr2 => &["S5", "S6"],
        }
    }

    /// Satellites carrying the instrument.
    pub fn satellites(&self) -> Vec<&'static str> {
        FILENAME_SAT
            .iter()
            .filter(|(i, _, _)| i == self)
            .map(|(_, s, _)| *s)
            .collect()
    }
}

impl FromStr for Instrument {
    type Err = GpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MHS" => Ok(Instrument::Mhs),
            "ATMS" => Ok(Instrument::Atms),
            "SSMIS" => Ok(Instrument::Ssmis),
            "AMSR2" => Ok(Instrument::Amsr2),
            _ => Err(GpmError::UnknownInstrument(s.to_string())),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// File name prefix of an instrument/satellite combination, e.g.
/// `NOAA18.MHS`.
pub fn filename_sat(instrument: Instrument, satellite: &str) -> GpmResult<&'static str> {
    FILENAME_SAT
        .iter()
        .find(|(i, s, _)| *i == instrument && *s == satellite)
        .map(|(_, _, prefix)| *prefix)
        .ok_or_else(|| GpmError::UnknownSatellite {
            instrument: instrument.to_string(),
            satellite: satellite.to_string(),
        })
}

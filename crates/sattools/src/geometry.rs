//! Footprint sizes and orientations of conical and cross-track scanners.
//!
//! IFOV values are (along scan, along track) in km. Cross-track scanners
//! (ATMS, MHS) are listed for nadir only; both AMSR2 89 GHz scans share one
//! geometry.

use nalgebra::Vector3;
use projection::geocentric::{from_ecef, to_ecef};
use projection::{Ellipsoid, PolarStereographic};
use rt_tools::polarization::scan_angle;

use crate::error::{SatError, SatResult};

const AMSR2_IFOV: [[f64; 2]; 14] = [
    [35.0, 62.0],
    [35.0, 62.0],
    [34.0, 58.0],
    [34.0, 58.0],
    [24.0, 42.0],
    [24.0, 42.0],
    [14.0, 22.0],
    [14.0, 22.0],
    [15.0, 26.0],
    [15.0, 26.0],
    [7.0, 12.0],
    [7.0, 12.0],
    [3.0, 5.0],
    [3.0, 5.0],
];

const SSMIS_IFOV: [[f64; 2]; 24] = [
    [17.0, 29.0],
    [17.0, 29.0],
    [17.0, 29.0],
    [17.0, 29.0],
    [17.0, 29.0],
    [16.0, 26.0],
    [16.0, 26.0],
    [9.0, 15.0],
    [9.0, 15.0],
    [9.0, 15.0],
    [9.0, 15.0],
    [44.0, 72.0],
    [44.0, 72.0],
    [44.0, 72.0],
    [26.0, 44.0],
    [26.0, 44.0],
    [9.0, 15.0],
    [9.0, 15.0],
    [16.0, 26.0],
    [16.0, 26.0],
    [16.0, 26.0],
    [16.0, 26.0],
    [16.0, 26.0],
    [16.0, 26.0],
];

/// ATMS beam widths (deg) per channel.
const ATMS_BEAM_WIDTH: [f64; 22] = [
    5.2, 5.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 1.1, 1.1, 1.1,
    1.1, 1.1, 1.1,
];

const MHS_BEAM_WIDTH: [f64; 5] = [1.1; 5];

fn channel_entry<T: Copy>(
    table: &[T],
    kind: &'static str,
    instrument: &str,
    channel: u32,
) -> SatResult<T> {
    (channel as usize)
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .copied()
        .ok_or_else(|| SatError::UnknownChannel {
            kind,
            instrument: instrument.to_string(),
            channel,
        })
}

/// Beam width in degrees of a cross-track sounder channel.
pub fn beam_width(instrument: &str, channel: u32) -> SatResult<f64> {
    let table: &[f64] = match instrument {
        "ATMS" => &ATMS_BEAM_WIDTH,
        "MHS" => &MHS_BEAM_WIDTH,
        _ => &[],
    };
    channel_entry(table, "beam width", instrument, channel)
}

/// Footprint size (along scan, along track) in km.
pub fn ifov_km(instrument: &str, channel: u32) -> SatResult<[f64; 2]> {
    match instrument {
        "AMSR2" => channel_entry(&AMSR2_IFOV, "IFOV", instrument, channel),
        "SSMIS" => channel_entry(&SSMIS_IFOV, "IFOV", instrument, channel),
        "ATMS" => {
            let w = match beam_width(instrument, channel)? {
                bw if bw > 5.0 => 74.8,
                bw if bw > 2.0 => 31.6,
                _ => 15.8,
            };
            Ok([w, w])
        }
        "MHS" => {
            beam_width(instrument, channel)?;
            Ok([15.88, 15.88])
        }
        _ => Err(SatError::UnknownChannel {
            kind: "IFOV",
            instrument: instrument.to_string(),
            channel,
        }),
    }
}

/// Approximate footprint (width, height) in km of a beam of `beam_width`
/// degrees hitting the surface at `incidence_angle` degrees from a
/// satellite at `altitude` km.
///
/// Earth curvature is mimicked by stretching the scan angle by 14 %,
/// which holds for platforms near 833 km. Exact at nadir; at 64° the
/// result is a few percent off (1.1° beam: 68.4 × 30.0 km real, 64.0 × 32.0
/// km computed).
pub fn ifov(beam_width: f64, incidence_angle: f64, altitude: f64) -> (f64, f64) {
    let angle = (scan_angle(altitude * 1e3, incidence_angle) * 1.14).to_radians();
    let half = beam_width.to_radians() / 2.0;

    let line_of_sight = altitude / angle.cos();
    let width = 2.0 * line_of_sight * half.tan();
    let height = altitude * ((angle + half).tan() - (angle - half).tan());
    (width, height)
}

/// Position and orientation of a footprint ellipse on a polar stereographic
/// map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsePlacement {
    pub x: f64,
    pub y: f64,
    /// Rotation of the main axis in degrees, counterclockwise from the map
    /// y axis
    pub angle: f64,
}

/// Orient a footprint ellipse at `footprint` (lon, lat) so that its main
/// axis points towards the sub-satellite point `ssp` (lon, lat).
pub fn ellipse_orientation(
    ssp: (f64, f64),
    footprint: (f64, f64),
    proj: &PolarStereographic,
) -> EllipsePlacement {
    let ellipsoid = Ellipsoid::WGS84;
    let ssp_g = to_ecef(ssp.0, ssp.1, 0.0, &ellipsoid);
    let fpr_g = to_ecef(footprint.0, footprint.1, 0.0, &ellipsoid);

    // point slightly off the footprint towards the satellite
    let fpp_g: Vector3<f64> = fpr_g + (ssp_g - fpr_g) * 1e-2;

    let to_map = |p: &Vector3<f64>| {
        let (lon, lat, _) = from_ecef(p, &ellipsoid);
        proj.forward(lon, lat)
    };
    let (x, y) = to_map(&fpr_g);
    let (px, py) = to_map(&fpp_g);

    let angle = ((py - y).atan2(px - x) + std::f64::consts::FRAC_PI_2).to_degrees();
    EllipsePlacement { x, y, angle }
}

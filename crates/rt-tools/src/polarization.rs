//! Mixing of vertical and horizontal polarization.
//!
//! Cross-track sounders (MHS, ATMS) observe quasi-vertical (QV) or
//! quasi-horizontal (QH) polarization that rotates with the scan angle,
//! while conical scanners (SSMIS, AMSR2) and PAMTRA provide pure V and H.

use std::fmt;
use std::str::FromStr;

use lizard_common::{Dataset, LizardError, Variable};
use tracing::debug;

use crate::error::{RtError, RtResult};

/// Mean Earth radius (m) used for the scan geometry.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// PAMTRA output level (m) used for satellite instruments.
pub const SATELLITE_HEIGHT: f64 = 833_000.0;

/// Values of the `polarization` coordinate of PAMTRA output.
pub const POL_V: f64 = 0.0;
pub const POL_H: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarization {
    V,
    H,
    QV,
    QH,
}

impl FromStr for Polarization {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "V" => Ok(Polarization::V),
            "H" => Ok(Polarization::H),
            "QV" => Ok(Polarization::QV),
            "QH" => Ok(Polarization::QH),
            _ => Err(RtError::UnknownPolarization(s.to_string())),
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Polarization::V => "V",
            Polarization::H => "H",
            Polarization::QV => "QV",
            Polarization::QH => "QH",
        };
        f.write_str(s)
    }
}

/// Scan angle (degrees) at the platform for a local incidence angle
/// (degrees) at the surface and a platform altitude (m).
pub fn scan_angle(altitude: f64, incidence_angle: f64) -> f64 {
    (EARTH_RADIUS / (EARTH_RADIUS + altitude) * incidence_angle.to_radians().sin())
        .asin()
        .to_degrees()
}

/// Quasi-vertical radiance from V and H.
pub fn vh2qv(v: f64, h: f64, incidence_angle: f64, altitude: f64) -> f64 {
    let (cos2, sin2) = scan_weights(altitude, incidence_angle);
    v * cos2 + h * sin2
}

/// Quasi-horizontal radiance from V and H.
pub fn vh2qh(v: f64, h: f64, incidence_angle: f64, altitude: f64) -> f64 {
    let (cos2, sin2) = scan_weights(altitude, incidence_angle);
    h * cos2 + v * sin2
}

fn scan_weights(altitude: f64, incidence_angle: f64) -> (f64, f64) {
    let s = scan_angle(altitude, incidence_angle).to_radians();
    (s.cos().powi(2), s.sin().powi(2))
}

/// Brightness temperature of an instrument from a PAMTRA simulation.
///
/// `ds` holds `tb` with at least the dimensions `obs_height`, `angle` and
/// `polarization` (coordinate values [`POL_V`] and [`POL_H`]). The
/// simulation is interpolated to the absolute incidence angle; satellites
/// use the [`SATELLITE_HEIGHT`] level, other platforms are interpolated to
/// `altitude`. For mixed polarizations `altitude` sets the scan geometry.
pub fn pamtra_to_instrument(
    ds: &Dataset,
    polarization: Polarization,
    incidence_angle: f64,
    altitude: f64,
    is_satellite: bool,
) -> RtResult<Variable> {
    let incidence_angle = incidence_angle.abs();
    let tb = ds.var("tb")?;
    let heights = ds.values("obs_height")?;

    let tb = if is_satellite {
        let i = heights
            .iter()
            .position(|h| *h == SATELLITE_HEIGHT)
            .ok_or_else(|| LizardError::CoordinateValueNotFound {
                dim: "obs_height".to_string(),
                value: SATELLITE_HEIGHT,
            })?;
        tb.index("obs_height", i)?
    } else {
        interp_linear(tb, &heights, "obs_height", altitude)?
    };
    let tb = interp_linear(&tb, &ds.values("angle")?, "angle", incidence_angle)?;

    let pols = ds.values("polarization")?;
    let pick = |value: f64| -> RtResult<Variable> {
        let i = pols
            .iter()
            .position(|p| *p == value)
            .ok_or_else(|| LizardError::CoordinateValueNotFound {
                dim: "polarization".to_string(),
                value,
            })?;
        Ok(tb.index("polarization", i)?)
    };

    debug!(%polarization, incidence_angle, altitude, is_satellite, "Converting PAMTRA output");

    let out = match polarization {
        Polarization::V => pick(POL_V)?,
        Polarization::H => pick(POL_H)?,
        Polarization::QV | Polarization::QH => {
            let v = pick(POL_V)?;
            let h = pick(POL_H)?;
            let (cos2, sin2) = scan_weights(altitude, incidence_angle);
            let data = match polarization {
                Polarization::QV => &v.data * cos2 + &h.data * sin2,
                _ => &h.data * cos2 + &v.data * sin2,
            };
            Variable {
                dims: v.dims.clone(),
                data,
                attrs: v.attrs.clone(),
            }
        }
    };
    Ok(out)
}

/// Linear interpolation of a variable to one value of a monotonic
/// coordinate; the dimension is dropped.
pub fn interp_linear(var: &Variable, coord: &[f64], dim: &str, value: f64) -> RtResult<Variable> {
    let out_of_range = || RtError::OutOfRange {
        dim: dim.to_string(),
        value,
    };

    if let Some(i) = coord.iter().position(|c| *c == value) {
        return Ok(var.index(dim, i)?);
    }

    let i = coord
        .windows(2)
        .position(|w| (w[0] < value && value < w[1]) || (w[1] < value && value < w[0]))
        .ok_or_else(out_of_range)?;
    let w = (value - coord[i]) / (coord[i + 1] - coord[i]);

    let lo = var.index(dim, i)?;
    let hi = var.index(dim, i + 1)?;
    Ok(Variable {
        dims: lo.dims.clone(),
        data: &lo.data * (1.0 - w) + &hi.data * w,
        attrs: lo.attrs.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_scan_angle() {
        assert_approx_eq!(scan_angle(833_000.0, 53.1), 45.0089, 1e-4);
        assert_approx_eq!(scan_angle(0.0, 30.0), 30.0, 1e-9);
        assert_eq!(scan_angle(833_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_mixed_polarization() {
        assert_approx_eq!(vh2qv(260.0, 200.0, 53.1, 833_000.0), 229.9907, 1e-4);
        assert_approx_eq!(vh2qh(260.0, 200.0, 53.1, 833_000.0), 230.0093, 1e-4);
        // nadir sees pure polarization
        assert_eq!(vh2qv(260.0, 200.0, 0.0, 833_000.0), 260.0);
        assert_eq!(vh2qh(260.0, 200.0, 0.0, 833_000.0), 200.0);
    }

    #[test]
    fn test_parse_polarization() {
        assert_eq!("qv".parse::<Polarization>().unwrap(), Polarization::QV);
        assert_eq!(Polarization::QH.to_string(), "QH");
        assert!(matches!(
            "X".parse::<Polarization>(),
            Err(RtError::UnknownPolarization(_))
        ));
    }

    /// tb = 100 * polarization + angle + obs_height / 1000
    fn simulation() -> Dataset {
        let heights = [0.0, 1000.0, SATELLITE_HEIGHT];
        let angles = [0.0, 30.0, 60.0];
        let mut values = Vec::new();
        for h in heights {
            for a in angles {
                for p in [POL_V, POL_H] {
                    values.push(100.0 * p + a + h / 1000.0);
                }
            }
        }
        let mut ds = Dataset::new();
        ds.insert_coord("obs_height", Variable::from_vec("obs_height", heights.to_vec()))
            .unwrap();
        ds.insert_coord("angle", Variable::from_vec("angle", angles.to_vec()))
            .unwrap();
        ds.insert_coord("polarization", Variable::from_vec("polarization", vec![POL_V, POL_H]))
            .unwrap();
        ds.insert_var(
            "tb",
            Variable::from_shape_vec(&["obs_height", "angle", "polarization"], &[3, 3, 2], values)
                .unwrap(),
        )
        .unwrap();
        ds
    }

    #[test]
    fn test_pamtra_to_satellite() {
        let ds = simulation();
        let tb = pamtra_to_instrument(&ds, Polarization::H, -45.0, 833_000.0, true).unwrap();
        assert!(tb.dims.is_empty());
        assert_approx_eq!(tb.to_vec()[0], 100.0 + 45.0 + 833.0, 1e-9);
    }

    #[test]
    fn test_pamtra_to_aircraft() {
        let ds = simulation();
        let tb = pamtra_to_instrument(&ds, Polarization::V, 15.0, 500.0, false).unwrap();
        assert_approx_eq!(tb.to_vec()[0], 15.5, 1e-9);

        let qv = pamtra_to_instrument(&ds, Polarization::QV, 15.0, 500.0, false).unwrap();
        let (cos2, sin2) = scan_weights(500.0, 15.0);
        assert_approx_eq!(qv.to_vec()[0], 15.5 * cos2 + 115.5 * sin2, 1e-9);

        assert!(matches!(
            pamtra_to_instrument(&ds, Polarization::V, 75.0, 500.0, false),
            Err(RtError::OutOfRange { .. })
        ));
    }
}

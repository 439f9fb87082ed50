//! Conversions between humidity measures and column integrals.
//!
//! Pressure arguments are in hPa unless noted, temperatures in K.

use lizard_common::{Dataset, Variable};
use ndarray::{ArrayD, Axis, IxDyn, Zip};

use crate::error::RtResult;

/// Molar mass of dry air (kg/mol).
pub const MOLAR_MASS_DRY_AIR: f64 = 28.9647e-3;

/// Molar mass of water vapor (kg/mol).
pub const MOLAR_MASS_WATER_VAPOR: f64 = 18.01528e-3;

/// Specific gas constant of dry air (J/kg/K) used for air density.
pub const R_DRY_AIR: f64 = 287.0;

/// Ratio of the molar masses of water vapor and dry air in the
/// mixing ratio equations.
const EPS: f64 = 18.0 / 28.96;

/// Specific humidity (kg/kg) from the molecular densities (1/m3) of water
/// vapor and of moist air.
pub fn mol2q(water_vapor_density: f64, air_density: f64) -> f64 {
    let dry_air_density = air_density - water_vapor_density;
    water_vapor_density * MOLAR_MASS_WATER_VAPOR
        / (dry_air_density * MOLAR_MASS_DRY_AIR + water_vapor_density * MOLAR_MASS_WATER_VAPOR)
}

/// Saturation vapor pressure over water (Pa), Goff-Gratch equation.
pub fn esat(t: f64) -> f64 {
    let ts = 373.16;
    100.0
        * 1013.246
        * 10f64.powf(
            -7.90298 * (ts / t - 1.0) + 5.02808 * (ts / t).log10()
                - 1.3816e-7 * (10f64.powf(11.344 * (1.0 - t / ts)) - 1.0)
                + 8.1328e-3 * (10f64.powf(-3.49149 * (ts / t - 1.0)) - 1.0),
        )
}

/// Mixing ratio (kg/kg) from pressure (hPa), temperature and relative
/// humidity as a fraction.
pub fn calculate_qv(p: f64, t: f64, rh: f64) -> f64 {
    let e = rh * esat(t);
    let p = p * 100.0;
    EPS * e / (p - e + EPS * e)
}

/// Relative humidity (fraction) from mixing ratio, pressure in Pa and
/// temperature.
pub fn q2rh(q: f64, p: f64, t: f64) -> f64 {
    let e_sat = esat(t);
    let e = q * (p - e_sat) / (EPS + q);
    e / e_sat
}

/// Moist air density (kg/m3) from pressure (hPa), temperature and mixing
/// ratio, using the virtual temperature.
pub fn calculate_air_density(p: f64, t: f64, qv: f64) -> f64 {
    let tv = t * (1.0 + 0.61 * qv);
    p * 100.0 / (R_DRY_AIR * tv)
}

// ============================================================================
// Profiles
// ============================================================================

/// Integrated water vapor of profiles in a dataset.
///
/// Adds `qv` (kg/kg), `rho` (kg/m3), `abs_hum` (kg/m3) and `iwv` (kg/m2).
/// Pressure is in hPa, relative humidity in percent and height in m. The
/// column is integrated along the height dimension `z_var` as
/// `sum(abs_hum[i] * (z[i] - z[i-1]))` for `i >= 1`.
pub fn calculate_iwv(
    ds: &mut Dataset,
    p_var: &str,
    t_var: &str,
    rh_var: &str,
    z_var: &str,
) -> RtResult<()> {
    let vars = broadcast_common(&[ds.var(p_var)?, ds.var(t_var)?, ds.var(rh_var)?])?;
    let dims = vars[0].dims.clone();
    let (p, t, rh) = (&vars[0].data, &vars[1].data, &vars[2].data);

    let qv = Zip::from(p)
        .and(t)
        .and(rh)
        .map_collect(|p, t, rh| calculate_qv(*p, *t, rh * 0.01));
    let rho = Zip::from(p)
        .and(t)
        .and(&qv)
        .map_collect(|p, t, q| calculate_air_density(*p, *t, *q));
    let abs_hum = &rho * &qv;

    let abs_hum = Variable::new(&dims, abs_hum)?.with_attr("units", "kg m-3");
    let iwv = integrate(&abs_hum, ds.var(z_var)?, z_var)?.with_attr("units", "kg m-2");

    ds.insert_var("qv", Variable::new(&dims, qv)?.with_attr("units", "kg kg-1"))?;
    ds.insert_var("rho", Variable::new(&dims, rho)?.with_attr("units", "kg m-3"))?;
    ds.insert_var("abs_hum", abs_hum)?;
    ds.insert_var("iwv", iwv)?;
    Ok(())
}

/// Broadcast variables to the union of their dimensions, ordered by first
/// appearance.
pub(crate) fn broadcast_common(vars: &[&Variable]) -> RtResult<Vec<Variable>> {
    let mut target: Vec<(String, usize)> = Vec::new();
    for var in vars {
        for (d, n) in var.dims.iter().zip(var.shape()) {
            if !target.iter().any(|(name, _)| name == d) {
                target.push((d.clone(), *n));
            }
        }
    }
    vars.iter()
        .map(|v| v.broadcast_to(&target).map_err(Into::into))
        .collect()
}

fn integrate(values: &Variable, z: &Variable, dim: &str) -> RtResult<Variable> {
    let vars = broadcast_common(&[values, z])?;
    let (values, z) = (&vars[0], &vars[1]);
    let axis = values
        .axis(dim)
        .ok_or_else(|| lizard_common::LizardError::DimensionNotFound(dim.to_string()))?;

    let mut out_shape = values.shape().to_vec();
    out_shape.remove(axis);
    let mut out = ArrayD::<f64>::zeros(IxDyn(&out_shape));

    Zip::from(&mut out)
        .and(values.data.lanes(Axis(axis)))
        .and(z.data.lanes(Axis(axis)))
        .for_each(|sum, v, z| {
            *sum = (1..v.len()).map(|i| v[i] * (z[i] - z[i - 1])).sum();
        });

    let mut dims = values.dims.clone();
    dims.remove(axis);
    Ok(Variable::new(&dims, out)?)
}

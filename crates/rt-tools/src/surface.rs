//! PAMTRA surface properties from sea-land and sea ice fractions.

use std::str::FromStr;

use lizard_common::{Dataset, Variable};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

use crate::error::{RtError, RtResult};

/// Surface type used for every cell with [`SurfaceKind::Idealized`];
/// PAMTRA then applies its fixed emissivity.
pub const IDEALIZED_SURFACE_TYPE: f64 = -9999.0;

/// How surface types are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Ocean (0) or land/sea ice (1) from the area fractions
    #[default]
    Natural,
    /// Fixed emissivity everywhere
    Idealized,
}

/// Emissivity models and their PAMTRA codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceModel {
    #[serde(rename = "TESSEM2")]
    Tessem2,
    #[serde(rename = "FASTEM")]
    Fastem,
    #[serde(rename = "TELSEM2")]
    Telsem2,
    #[serde(rename = "SSMI")]
    Ssmi,
}

impl SurfaceModel {
    /// Ocean models (TESSEM2, FASTEM) and land models (TELSEM2, SSMI) share
    /// the codes 0 and 1.
    pub fn code(&self) -> f64 {
        match self {
            SurfaceModel::Tessem2 | SurfaceModel::Telsem2 => 0.0,
            SurfaceModel::Fastem | SurfaceModel::Ssmi => 1.0,
        }
    }
}

impl FromStr for SurfaceModel {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TESSEM2" => Ok(SurfaceModel::Tessem2),
            "FASTEM" => Ok(SurfaceModel::Fastem),
            "TELSEM2" => Ok(SurfaceModel::Telsem2),
            "SSMI" => Ok(SurfaceModel::Ssmi),
            _ => Err(RtError::UnknownSurfaceModel(s.to_string())),
        }
    }
}

/// Surface reflection type, stored as 0 (F) or 1 (L) in `sfc_refl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reflection {
    /// Fresnel (specular)
    #[serde(rename = "F")]
    Fresnel,
    /// Lambertian
    #[serde(rename = "L")]
    Lambertian,
}

impl Reflection {
    pub fn code(&self) -> f64 {
        match self {
            Reflection::Fresnel => 0.0,
            Reflection::Lambertian => 1.0,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Reflection::Fresnel => 'F',
            Reflection::Lambertian => 'L',
        }
    }
}

impl FromStr for Reflection {
    type Err = RtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Reflection::Fresnel),
            "L" => Ok(Reflection::Lambertian),
            _ => Err(RtError::UnknownReflection(s.to_string())),
        }
    }
}

/// Surface classes derived from the area fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ocean,
    Land,
    SeaIce,
}

impl Surface {
    /// Classification at 50 % area fraction. Cells exactly at 0.5 belong to
    /// no class.
    pub fn contains(&self, slf: f64, sif: f64) -> bool {
        match self {
            Surface::Ocean => slf < 0.5 && sif < 0.5,
            Surface::Land => slf > 0.5,
            Surface::SeaIce => slf < 0.5 && sif > 0.5,
        }
    }
}

/// Surface settings of a PAMTRA profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PamtraSurface {
    pub kind: SurfaceKind,
    pub ocean_model: SurfaceModel,
    pub ocean_refl: Reflection,
    pub land_model: SurfaceModel,
    pub land_refl: Reflection,
    pub sea_ice_model: SurfaceModel,
    pub sea_ice_refl: Reflection,
}

impl Default for PamtraSurface {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::Natural,
            ocean_model: SurfaceModel::Tessem2,
            ocean_refl: Reflection::Lambertian,
            land_model: SurfaceModel::Telsem2,
            land_refl: Reflection::Lambertian,
            sea_ice_model: SurfaceModel::Telsem2,
            sea_ice_refl: Reflection::Lambertian,
        }
    }
}

impl PamtraSurface {
    /// Add `sfc_type`, `sfc_model` and `sfc_refl` on the grid of `sfc_slf`
    /// (sea-land fraction, 1 = land) and `sfc_sif` (sea ice fraction).
    ///
    /// Cells in no class keep model 0 and Fresnel reflection.
    pub fn apply(&self, ds: &mut Dataset) -> RtResult<()> {
        let slf = ds.var("sfc_slf")?;
        let sif = ds.var("sfc_sif")?.broadcast_to(&dims_of(slf))?;

        let classify = |f: &dyn Fn(Surface) -> f64, default: f64| {
            Zip::from(&slf.data).and(&sif.data).map_collect(|slf, sif| {
                [Surface::Land, Surface::SeaIce, Surface::Ocean]
                    .into_iter()
                    .find(|s| s.contains(*slf, *sif))
                    .map(f)
                    .unwrap_or(default)
            })
        };

        let sfc_type = match self.kind {
            SurfaceKind::Natural => classify(
                &|s| match s {
                    Surface::Ocean => 0.0,
                    Surface::Land | Surface::SeaIce => 1.0,
                },
                0.0,
            ),
            SurfaceKind::Idealized => slf.data.mapv(|_| IDEALIZED_SURFACE_TYPE),
        };
        let sfc_model = classify(&|s| self.model(s).code(), 0.0);
        let sfc_refl = classify(&|s| self.reflection(s).code(), Reflection::Fresnel.code());

        let dims = slf.dims.clone();
        ds.insert_var(
            "sfc_type",
            Variable::new(&dims, sfc_type)?
                .with_attr("long_name", "surface type")
                .with_attr("flag_meanings", "ocean land_or_sea_ice"),
        )?;
        ds.insert_var(
            "sfc_model",
            Variable::new(&dims, sfc_model)?.with_attr("long_name", "surface model"),
        )?;
        ds.insert_var(
            "sfc_refl",
            Variable::new(&dims, sfc_refl)?
                .with_attr("long_name", "surface reflection type")
                .with_attr("flag_meanings", "F L"),
        )?;
        Ok(())
    }

    pub fn model(&self, surface: Surface) -> SurfaceModel {
        match surface {
            Surface::Ocean => self.ocean_model,
            Surface::Land => self.land_model,
            Surface::SeaIce => self.sea_ice_model,
        }
    }

    pub fn reflection(&self, surface: Surface) -> Reflection {
        match surface {
            Surface::Ocean => self.ocean_refl,
            Surface::Land => self.land_refl,
            Surface::SeaIce => self.sea_ice_refl,
        }
    }
}

fn dims_of(var: &Variable) -> Vec<(String, usize)> {
    var.dims
        .iter()
        .cloned()
        .zip(var.shape().iter().copied())
        .collect()
}

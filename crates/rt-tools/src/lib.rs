//! Radiative transfer helpers around the PAMTRA model.
//!
//! - [`thermodynamics`]: humidity conversions and integrated water vapor
//! - [`polarization`]: scan geometry and QV/QH mixing of simulated TBs
//! - [`surface`] and [`profile`]: PAMTRA input profiles from any gridded
//!   dataset, with an ERA-5 shortcut
//! - [`output`]: simulation results as a [`lizard_common::Dataset`]

pub mod error;
pub mod output;
pub mod polarization;
pub mod profile;
pub mod surface;
pub mod thermodynamics;

pub use error::{RtError, RtResult};
pub use output::PamtraOutput;
pub use polarization::{pamtra_to_instrument, Polarization};
pub use profile::{era5_varnames, GridDimensions, PamProfile, ProfileOptions, VarNames, PAM_VARS};
pub use surface::{PamtraSurface, Reflection, SurfaceKind, SurfaceModel};

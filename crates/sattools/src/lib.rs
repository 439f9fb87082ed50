//! Satellite tooling.
//!
//! - [`geometry`]: footprint sizes and ellipse orientation on polar maps
//! - [`colocation`]: distance statistics of sub-satellite tracks to a target
//! - [`ephemeris`]: sub-satellite tracks from TLE records

pub mod colocation;
pub mod ephemeris;
pub mod error;
pub mod geometry;

pub use colocation::{distance_to, hourly_min_distance};
pub use ephemeris::{build_tracks, Propagator, TleRecord, SATELLITES};
pub use error::{SatError, SatResult};
pub use geometry::{beam_width, ellipse_orientation, ifov, ifov_km, EllipsePlacement};

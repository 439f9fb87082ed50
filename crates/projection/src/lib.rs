//! Coordinate reference system transformations.
//!
//! Implements the handful of map projections needed for footprint and
//! flight-track geometry from scratch: north polar stereographic
//! (EPSG:3413 and the generic pole-tangent form), UTM, and geodetic to
//! Earth-centred Earth-fixed coordinates.

pub mod distance;
pub mod ellipsoid;
pub mod error;
pub mod geocentric;
pub mod polar;
pub mod transform;
pub mod utm;

pub use distance::{distance_along_track, haversine_km};
pub use ellipsoid::Ellipsoid;
pub use error::{ProjectionError, ProjectionResult};
pub use polar::PolarStereographic;
pub use transform::{project, Projector};
pub use utm::TransverseMercator;

//! Flight segment metadata.
//!
//! Research flights are keyed by `MISSION_PLATFORM_NAME` (for example
//! `HALO-AC3_P5_RF02`) and split into named, typed segments. The metadata
//! is read from the ac3airborne flight-segment YAML files into a
//! [`FlightCatalog`], which is then passed to every lookup.

pub mod catalog;
pub mod error;
pub mod flight;
pub mod lists;

pub use catalog::FlightCatalog;
pub use error::{FlightError, FlightResult};
pub use flight::{Flight, FlightId, Segment, PROFILE_KINDS};

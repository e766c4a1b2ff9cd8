//! Location gateway: postal-code directory, geocoding, and map rendering.
//!
//! [`GeoClient`] talks to a ViaCEP-compatible directory and a
//! Nominatim-compatible search endpoint, pacing each service so that
//! consecutive requests are at least one second apart. [`LeafletMap`] writes
//! a standalone HTML map of the stored containers.

mod nominatim;
mod pacer;
mod viacep;

pub mod client;
pub mod error;
pub mod map;

pub use client::{GeoClient, GeoConfig};
pub use error::{Error, Result};
pub use map::LeafletMap;
pub use pacer::Pacer;

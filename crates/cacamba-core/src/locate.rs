//! Location seams: address / coordinate lookup and map rendering.
//!
//! Lookups return `None` for every kind of failure (not found, network error,
//! malformed response). Implementations log the cause; the workflow only
//! needs to know whether enrichment succeeded.

use std::{future::Future, path::PathBuf};

use crate::container::{Address, Container, Coordinates};

/// External address and coordinate resolution.
pub trait LocationService: Send + Sync {
  /// Resolve a postal code to its street-level address.
  fn lookup_address<'a>(
    &'a self,
    postal_code: &'a str,
  ) -> impl Future<Output = Option<Address>> + Send + 'a;

  /// Resolve a formatted full address to a position.
  fn lookup_coordinates<'a>(
    &'a self,
    full_address: &'a str,
  ) -> impl Future<Output = Option<Coordinates>> + Send + 'a;
}

/// Produces a standalone map document of the given containers.
pub trait MapRenderer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Render one marker per container that has coordinates and return the
  /// path of the written file.
  fn render(&self, containers: &[Container]) -> Result<PathBuf, Self::Error>;
}

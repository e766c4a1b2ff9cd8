//! The `ContainerStore` trait.
//!
//! Implemented by storage backends (e.g. `cacamba-store-csv`). The workflow
//! controller depends on this abstraction, not on any concrete file format.

use std::future::Future;

use crate::container::Container;

/// Result of [`ContainerStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
  /// The record was appended and the store persisted.
  Inserted,
  /// A record with the same identifier already exists; nothing was written.
  Duplicate,
}

/// Abstraction over a container store backend.
///
/// Every operation reads the full record set from the backing medium; there
/// is no in-memory cache. Mutations rewrite the whole store.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime.
pub trait ContainerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an empty store (header only) if none exists yet.
  ///
  /// Idempotent. Returns `true` when this call created the store.
  fn ensure_exists(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every record currently in the store, in stored order.
  fn load_all(&self) -> impl Future<Output = Result<Vec<Container>, Self::Error>> + Send + '_;

  /// Append `container` unless its identifier is already taken.
  fn save(
    &self,
    container: Container,
  ) -> impl Future<Output = Result<Insertion, Self::Error>> + Send + '_;

  /// Delete the first record whose identifier equals `identifier`.
  ///
  /// Returns the removed record, or `None` (and writes nothing) if no record
  /// matched.
  fn remove<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Option<Container>, Self::Error>> + Send + 'a;
}

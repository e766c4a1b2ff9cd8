//! Error types for `cacamba-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid placement date {input:?}: {reason}")]
  InvalidDate {
    input:  String,
    reason: &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error type for `cacamba-locate`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{service} answered {status}")]
  Status {
    service: &'static str,
    status:  reqwest::StatusCode,
  },

  #[error("invalid service url {url:?}: {reason}")]
  BaseUrl { url: String, reason: String },

  #[error("unreadable coordinate {0:?}")]
  Coordinate(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

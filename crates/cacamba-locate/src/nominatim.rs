//! Nominatim search wire format.
//!
//! `GET {base}/search?q=<address>&format=json` answers a JSON array of
//! places, best match first. Coordinates come back as decimal strings.

use cacamba_core::container::Coordinates;
use reqwest::Url;
use serde::Deserialize;

use crate::{Error, Result};

/// Nominatim sends strings; some compatible services send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Degrees {
  Text(String),
  Number(f64),
}

impl Degrees {
  fn value(&self) -> Result<f64> {
    match self {
      Self::Number(n) => Ok(*n),
      Self::Text(s) => s
        .trim()
        .parse()
        .map_err(|_| Error::Coordinate(s.clone())),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct Place {
  pub lat: Degrees,
  pub lon: Degrees,
}

/// Coordinates of the best match, `None` when nothing matched.
pub fn first_coordinates(places: &[Place]) -> Result<Option<Coordinates>> {
  let Some(best) = places.first() else {
    return Ok(None);
  };
  Ok(Some(Coordinates {
    latitude:  best.lat.value()?,
    longitude: best.lon.value()?,
  }))
}

/// `{base}/search`.
pub fn search_url(base: &str) -> Result<Url> {
  let mut url = Url::parse(base).map_err(|e| Error::BaseUrl {
    url:    base.to_owned(),
    reason: e.to_string(),
  })?;
  url
    .path_segments_mut()
    .map_err(|()| Error::BaseUrl {
      url:    base.to_owned(),
      reason: "cannot be a base".into(),
    })?
    .pop_if_empty()
    .push("search");
  Ok(url)
}

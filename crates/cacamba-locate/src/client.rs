//! Async HTTP client for the postal-code directory and the geocoder.

use std::time::Duration;

use cacamba_core::{
  container::{Address, Coordinates},
  locate::LocationService,
};
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
  Error, Pacer, Result,
  nominatim::{self, Place},
  viacep::{self, ViaCepResponse},
};

/// Both services ask clients to stay at or below one request per second.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

// ─── Config ──────────────────────────────────────────────────────────────────

/// Connection settings for the location services.
#[derive(Debug, Clone)]
pub struct GeoConfig {
  /// Base URL of the ViaCEP-compatible directory.
  pub address_lookup_url: String,
  /// Base URL of the Nominatim-compatible geocoder.
  pub geocoding_url:      String,
  /// Sent on every request; Nominatim rejects anonymous clients.
  pub user_agent:         String,
  /// Raised to [`MIN_REQUEST_INTERVAL`] if lower.
  pub request_interval:   Duration,
  pub timeout:            Duration,
  /// Appended to geocoding queries, e.g. `Brasil`.
  pub country:            Option<String>,
}

impl Default for GeoConfig {
  fn default() -> Self {
    Self {
      address_lookup_url: "https://viacep.com.br".into(),
      geocoding_url:      "https://nominatim.openstreetmap.org".into(),
      user_agent:         "Mozilla/5.0 (compatible; CacambaGerenciador/1.0)".into(),
      request_interval:   MIN_REQUEST_INTERVAL,
      timeout:            Duration::from_secs(30),
      country:            Some("Brasil".into()),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Resolves postal codes and addresses over HTTP.
///
/// Each service has its own [`Pacer`], so a directory lookup never delays
/// the geocoder and vice versa.
pub struct GeoClient {
  http:         Client,
  config:       GeoConfig,
  address_pace: Pacer,
  geocode_pace: Pacer,
}

impl GeoClient {
  pub fn new(config: GeoConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent.clone())
      .build()?;
    let interval = config.request_interval.max(MIN_REQUEST_INTERVAL);
    Ok(Self {
      http,
      address_pace: Pacer::new(interval),
      geocode_pace: Pacer::new(interval),
      config,
    })
  }

  pub fn config(&self) -> &GeoConfig { &self.config }

  /// The free-text query sent to the geocoder for `full_address`.
  pub fn geocoding_query(&self, full_address: &str) -> String {
    match self.config.country.as_deref() {
      Some(country) if !country.is_empty() => format!("{full_address}, {country}"),
      _ => full_address.to_owned(),
    }
  }

  /// `GET {directory}/ws/{postal_code}/json/`
  pub async fn fetch_address(&self, postal_code: &str) -> Result<Option<Address>> {
    let url = viacep::lookup_url(&self.config.address_lookup_url, postal_code)?;

    self.address_pace.wait().await;
    debug!(%url, "postal code lookup");
    let resp = self.http.get(url).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status { service: "postal code directory", status: resp.status() });
    }

    let body: ViaCepResponse = resp.json().await?;
    Ok(body.into_address())
  }

  /// `GET {geocoder}/search?q=<query>&format=json`
  pub async fn fetch_coordinates(
    &self,
    full_address: &str,
  ) -> Result<Option<Coordinates>> {
    let url = nominatim::search_url(&self.config.geocoding_url)?;
    let query = self.geocoding_query(full_address);

    self.geocode_pace.wait().await;
    debug!(%url, %query, "geocoding lookup");
    let resp = self
      .http
      .get(url)
      .query(&[("q", query.as_str()), ("format", "json")])
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(Error::Status { service: "geocoder", status: resp.status() });
    }

    let places: Vec<Place> = resp.json().await?;
    nominatim::first_coordinates(&places)
  }
}

// ─── LocationService impl ────────────────────────────────────────────────────

impl LocationService for GeoClient {
  async fn lookup_address(&self, postal_code: &str) -> Option<Address> {
    match self.fetch_address(postal_code).await {
      Ok(Some(address)) => Some(address),
      Ok(None) => {
        debug!(postal_code, "postal code not found");
        None
      }
      Err(e) => {
        warn!(postal_code, error = %e, "postal code lookup failed");
        None
      }
    }
  }

  async fn lookup_coordinates(&self, full_address: &str) -> Option<Coordinates> {
    match self.fetch_coordinates(full_address).await {
      Ok(Some(coordinates)) => Some(coordinates),
      Ok(None) => {
        debug!(full_address, "geocoder found no match");
        None
      }
      Err(e) => {
        warn!(full_address, error = %e, "geocoding failed");
        None
      }
    }
  }
}

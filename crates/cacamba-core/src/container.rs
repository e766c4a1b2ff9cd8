//! The container record, the one entity the tracker manages.
//!
//! A container is created once, read in bulk, and eventually removed. It is
//! never updated in place. Its age and pickup status are derived on read from
//! the stored placement date.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date;

/// A container must be collected once it has been on site this many days.
pub const PICKUP_AFTER_DAYS: i64 = 3;

// ─── Location parts ──────────────────────────────────────────────────────────

/// Street-level address as returned by the postal-code directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub street:       String,
  pub neighborhood: String,
  pub city:         String,
  /// State abbreviation (`UF`), e.g. `RJ`.
  pub region:       String,
}

/// A WGS84 position. Latitude and longitude only ever travel together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

// ─── Container ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
  /// Operator-assigned number; unique across the store.
  pub identifier:     String,
  pub postal_code:    String,
  pub street_number:  String,
  /// Canonical `dd/mm/yyyy`; see [`crate::date`].
  pub placement_date: String,
  pub address:        Address,
  /// `None` when geocoding produced nothing for this address.
  pub coordinates:    Option<Coordinates>,
}

impl Container {
  /// The placement date as a calendar date, if it parses.
  pub fn placed_on(&self) -> Option<NaiveDate> {
    date::parse_canonical(&self.placement_date)
  }

  /// Whole days between the placement date and `today`.
  ///
  /// Returns 0 when the stored date does not parse. Future dates give a
  /// negative count.
  pub fn days_on_site_on(&self, today: NaiveDate) -> i64 {
    self
      .placed_on()
      .map(|placed| (today - placed).num_days())
      .unwrap_or(0)
  }

  /// [`Self::days_on_site_on`] against the local calendar date.
  pub fn days_on_site(&self) -> i64 {
    self.days_on_site_on(Local::now().date_naive())
  }

  pub fn needs_pickup_on(&self, today: NaiveDate) -> bool {
    self.days_on_site_on(today) >= PICKUP_AFTER_DAYS
  }

  pub fn needs_pickup(&self) -> bool {
    self.needs_pickup_on(Local::now().date_naive())
  }

  /// `street, number, neighborhood, city, region`.
  pub fn full_address(&self) -> String {
    format!(
      "{}, {}, {}, {}, {}",
      self.address.street,
      self.street_number,
      self.address.neighborhood,
      self.address.city,
      self.address.region,
    )
  }
}

//! Workflow controller.
//!
//! Sequences operator prompts, validation, enrichment, and persistence for
//! each user-facing action. The presentation layer implements [`Operator`];
//! everything else is reached through the store and location traits.
//!
//! Registration is linear and can be abandoned at any step:
//!
//! ```text
//! identifier → uniqueness check → postal code → address lookup
//!   → street number → placement date → normalisation
//!   → coordinate lookup → persist → refresh + map
//! ```
//!
//! Nothing is written unless every step succeeds. Storage errors are logged
//! and reported to the operator here; they never escape this module.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use crate::{
  container::Container,
  date,
  locate::{LocationService, MapRenderer},
  store::{ContainerStore, Insertion},
};

// ─── Operator seam ───────────────────────────────────────────────────────────

/// A question the workflow puts to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
  Identifier,
  PostalCode,
  StreetNumber,
  PlacementDate,
  RemovalIdentifier,
}

impl Prompt {
  pub fn title(&self) -> &'static str {
    match self {
      Self::RemovalIdentifier => "Remove container",
      _ => "Register container",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Identifier | Self::RemovalIdentifier => "Container number",
      Self::PostalCode => "Postal code (CEP)",
      Self::StreetNumber => "Street number",
      Self::PlacementDate => "Placement date (dd/mm/yy)",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
  Info,
  Warning,
  Error,
}

/// A message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub severity: Severity,
  pub message:  String,
}

impl Notice {
  pub fn info(message: impl Into<String>) -> Self {
    Self { severity: Severity::Info, message: message.into() }
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Self { severity: Severity::Warning, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { severity: Severity::Error, message: message.into() }
  }
}

/// The presentation layer, as seen by the workflow.
pub trait Operator {
  /// Ask for one value. `None` (or blank input) cancels the running action.
  fn ask(&mut self, prompt: Prompt) -> Option<String>;

  fn notify(&mut self, notice: Notice);

  /// The record set changed; redraw whatever lists it.
  fn refresh(&mut self, _containers: &[Container]) {}

  /// A fresh map was written to `path`.
  fn map_ready(&mut self, _path: &Path) {}
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// How a registration attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
  Registered(Container),
  /// The operator left this prompt empty.
  Cancelled(Prompt),
  Duplicate(String),
  AddressNotFound(String),
  InvalidDate(String),
  CoordinatesNotFound(String),
  StorageFailed,
}

/// How a removal attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
  Removed(Container),
  Cancelled,
  NotFound(String),
  StorageFailed,
}

const DATE_FORMATS_HINT: &str =
  "Accepted formats: dd/mm/yy, dd/mm/yyyy, ddmmyy, ddmmyyyy.";

// ─── Workflow ────────────────────────────────────────────────────────────────

pub struct Workflow<S, L, M> {
  store:   S,
  locator: L,
  map:     M,
}

impl<S, L, M> Workflow<S, L, M>
where
  S: ContainerStore,
  L: LocationService,
  M: MapRenderer,
{
  pub fn new(store: S, locator: L, map: M) -> Self {
    Self { store, locator, map }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Register ──────────────────────────────────────────────────────────────

  /// Walk the operator through registering one container.
  pub async fn register<O: Operator>(&self, op: &mut O) -> Registration {
    let Some(identifier) = ask(op, Prompt::Identifier) else {
      return Registration::Cancelled(Prompt::Identifier);
    };

    let existing = match self.store.load_all().await {
      Ok(existing) => existing,
      Err(e) => {
        storage_failure(op, "checking existing containers", &e);
        return Registration::StorageFailed;
      }
    };
    if existing.iter().any(|c| c.identifier == identifier) {
      op.notify(Notice::warning(format!(
        "Container {identifier} is already registered."
      )));
      return Registration::Duplicate(identifier);
    }

    let Some(postal_code) = ask(op, Prompt::PostalCode) else {
      return Registration::Cancelled(Prompt::PostalCode);
    };
    let Some(address) = self.locator.lookup_address(&postal_code).await else {
      op.notify(Notice::error(format!(
        "Postal code {postal_code} is invalid or was not found."
      )));
      return Registration::AddressNotFound(postal_code);
    };

    let Some(street_number) = ask(op, Prompt::StreetNumber) else {
      return Registration::Cancelled(Prompt::StreetNumber);
    };

    let Some(raw_date) = ask(op, Prompt::PlacementDate) else {
      return Registration::Cancelled(Prompt::PlacementDate);
    };
    let placement_date = match date::normalize(&raw_date) {
      Ok(normalized) => normalized,
      Err(e) => {
        debug!(error = %e, "placement date rejected");
        op.notify(Notice::error(format!(
          "Invalid date {raw_date:?}. {DATE_FORMATS_HINT}"
        )));
        return Registration::InvalidDate(raw_date);
      }
    };

    let mut container = Container {
      identifier,
      postal_code,
      street_number,
      placement_date,
      address,
      coordinates: None,
    };

    let full_address = container.full_address();
    let Some(coordinates) = self.locator.lookup_coordinates(&full_address).await
    else {
      op.notify(Notice::error(format!(
        "Could not find coordinates for {full_address}."
      )));
      return Registration::CoordinatesNotFound(full_address);
    };
    container.coordinates = Some(coordinates);

    match self.store.save(container.clone()).await {
      Ok(Insertion::Inserted) => {
        info!(identifier = %container.identifier, "container registered");
        op.notify(Notice::info(format!(
          "Container {} registered.",
          container.identifier
        )));
        self.publish(op).await;
        Registration::Registered(container)
      }
      Ok(Insertion::Duplicate) => {
        // Someone else saved the same identifier since the check above.
        warn!(identifier = %container.identifier, "identifier taken at save time");
        op.notify(Notice::warning(format!(
          "Container {} is already registered.",
          container.identifier
        )));
        Registration::Duplicate(container.identifier)
      }
      Err(e) => {
        storage_failure(op, "saving the container", &e);
        Registration::StorageFailed
      }
    }
  }

  // ── Remove ────────────────────────────────────────────────────────────────

  pub async fn remove<O: Operator>(&self, op: &mut O) -> Removal {
    let Some(identifier) = ask(op, Prompt::RemovalIdentifier) else {
      return Removal::Cancelled;
    };

    match self.store.remove(&identifier).await {
      Ok(Some(removed)) => {
        info!(identifier = %identifier, "container removed");
        op.notify(Notice::info(format!("Container {identifier} removed.")));
        self.publish(op).await;
        Removal::Removed(removed)
      }
      Ok(None) => {
        op.notify(Notice::warning(format!(
          "Container {identifier} is not registered."
        )));
        Removal::NotFound(identifier)
      }
      Err(e) => {
        storage_failure(op, "removing the container", &e);
        Removal::StorageFailed
      }
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Every stored container. A store that cannot be read yields an empty
  /// list after the failure is logged and reported.
  pub async fn containers<O: Operator>(&self, op: &mut O) -> Vec<Container> {
    match self.store.load_all().await {
      Ok(containers) => containers,
      Err(e) => {
        storage_failure(op, "loading containers", &e);
        Vec::new()
      }
    }
  }

  /// Containers due for pickup as of `today`.
  pub async fn overdue_on<O: Operator>(
    &self,
    op: &mut O,
    today: NaiveDate,
  ) -> Vec<Container> {
    self
      .containers(op)
      .await
      .into_iter()
      .filter(|c| c.needs_pickup_on(today))
      .collect()
  }

  pub async fn overdue<O: Operator>(&self, op: &mut O) -> Vec<Container> {
    self.overdue_on(op, Local::now().date_naive()).await
  }

  /// Raise one warning per overdue container. Returns how many were raised.
  pub async fn notify_overdue<O: Operator>(&self, op: &mut O) -> usize {
    let containers = self.containers(op).await;
    self.notify_overdue_among(op, &containers, Local::now().date_naive())
  }

  /// Like [`Workflow::notify_overdue`], over an already loaded list. The
  /// store is not read.
  pub fn notify_overdue_among<O: Operator>(
    &self,
    op: &mut O,
    containers: &[Container],
    today: NaiveDate,
  ) -> usize {
    let mut raised = 0;
    for c in containers.iter().filter(|c| c.needs_pickup_on(today)) {
      op.notify(Notice::warning(format!(
        "Container {} at {} has been on site for {} days and is ready for \
         pickup. Placed on {}.",
        c.identifier,
        c.full_address(),
        c.days_on_site_on(today),
        c.placement_date,
      )));
      raised += 1;
    }
    if raised > 0 {
      info!(count = raised, "containers due for pickup");
    }
    raised
  }

  // ── Map ───────────────────────────────────────────────────────────────────

  /// Render the map of all stored containers and hand it to the operator.
  pub async fn show_map<O: Operator>(&self, op: &mut O) -> Option<PathBuf> {
    let containers = self.containers(op).await;
    self.render(op, &containers)
  }

  /// Refresh the operator's view and regenerate the map after a mutation.
  async fn publish<O: Operator>(&self, op: &mut O) {
    let containers = self.containers(op).await;
    op.refresh(&containers);
    self.render(op, &containers);
  }

  fn render<O: Operator>(
    &self,
    op: &mut O,
    containers: &[Container],
  ) -> Option<PathBuf> {
    match self.map.render(containers) {
      Ok(path) => {
        info!(path = %path.display(), "map written");
        op.map_ready(&path);
        Some(path)
      }
      Err(e) => {
        error!(error = %e, "map rendering failed");
        op.notify(Notice::error(format!("Could not generate the map: {e}")));
        None
      }
    }
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Ask and trim; blank answers count as cancellation.
fn ask<O: Operator>(op: &mut O, prompt: Prompt) -> Option<String> {
  op.ask(prompt)
    .map(|answer| answer.trim().to_owned())
    .filter(|answer| !answer.is_empty())
}

fn storage_failure<O: Operator>(
  op: &mut O,
  action: &str,
  e: &(dyn std::error::Error + 'static),
) {
  error!(error = %e, "storage failure while {action}");
  op.notify(Notice::error(format!("Storage error while {action}: {e}")));
}

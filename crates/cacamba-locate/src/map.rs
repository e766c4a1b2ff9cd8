//! Standalone HTML map of container positions (Leaflet + OpenStreetMap
//! tiles).
//!
//! Marker data is embedded as a JSON array inside the page's script block.
//! Popup text is HTML-escaped before it is embedded, and `</` is broken up so
//! no stored value can close the script element early.

use std::path::{Path, PathBuf};

use cacamba_core::{
  container::{Container, Coordinates},
  locate::MapRenderer,
};
use chrono::{Local, NaiveDate};
use quick_xml::escape::escape;
use serde::Serialize;

use crate::{Error, Result};

/// File name of the generated map, written next to the data store.
pub const MAP_FILE_NAME: &str = "mapa_cacambas.html";

/// Rio de Janeiro city centre.
pub const DEFAULT_CENTER: Coordinates =
  Coordinates { latitude: -22.9068, longitude: -43.1729 };
pub const DEFAULT_ZOOM: u8 = 12;

pub const PICKUP_COLOR: &str = "#d63e2a";
pub const ON_SITE_COLOR: &str = "#38aadd";

// ─── Renderer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LeafletMap {
  path:   PathBuf,
  center: Coordinates,
  zoom:   u8,
}

impl LeafletMap {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM }
  }

  /// A map file named `file_name` in the same directory as `store_path`.
  pub fn beside(store_path: &Path, file_name: &str) -> Self {
    let dir = store_path.parent().unwrap_or_else(|| Path::new("."));
    Self::new(dir.join(file_name))
  }

  pub fn with_view(mut self, center: Coordinates, zoom: u8) -> Self {
    self.center = center;
    self.zoom = zoom;
    self
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Write the map as of `today` and return its path.
  pub fn render_on(&self, containers: &[Container], today: NaiveDate) -> Result<PathBuf> {
    let html = render_html(containers, today, self.center, self.zoom)?;
    std::fs::write(&self.path, html).map_err(|source| Error::Io {
      path: self.path.clone(),
      source,
    })?;
    Ok(self.path.clone())
  }
}

impl MapRenderer for LeafletMap {
  type Error = Error;

  fn render(&self, containers: &[Container]) -> Result<PathBuf> {
    self.render_on(containers, Local::now().date_naive())
  }
}

// ─── HTML ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Marker {
  lat:   f64,
  lon:   f64,
  color: &'static str,
  popup: String,
}

fn marker(c: &Container, coordinates: Coordinates, today: NaiveDate) -> Marker {
  let color = if c.needs_pickup_on(today) { PICKUP_COLOR } else { ON_SITE_COLOR };
  let popup = format!(
    "<b>Container {}</b><br>Address: {}<br>Placement date: {}<br>Days on site: {}",
    escape(c.identifier.as_str()),
    escape(c.full_address().as_str()),
    escape(c.placement_date.as_str()),
    c.days_on_site_on(today),
  );
  Marker {
    lat: coordinates.latitude,
    lon: coordinates.longitude,
    color,
    popup,
  }
}

/// The full page. Containers without coordinates are left off the map.
pub fn render_html(
  containers: &[Container],
  today: NaiveDate,
  center: Coordinates,
  zoom: u8,
) -> Result<String> {
  let markers: Vec<Marker> = containers
    .iter()
    .filter_map(|c| c.coordinates.map(|xy| marker(c, xy, today)))
    .collect();
  let markers = serde_json::to_string(&markers)?.replace("</", "<\\/");

  Ok(format!(
    r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Containers</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const markers = {markers};
const map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
for (const m of markers) {{
  L.circleMarker([m.lat, m.lon], {{
    radius: 9, color: m.color, fillColor: m.color, fillOpacity: 0.8
  }}).bindPopup(m.popup, {{ maxWidth: 300 }}).addTo(map);
}}
</script>
</body>
</html>
"#,
    lat = center.latitude,
    lon = center.longitude,
  ))
}

//! Persistent settings: where the data store lives and how to reach the
//! location services.
//!
//! Settings are read from a JSON file (with `CACAMBA_*` environment
//! overrides) and written back whenever the operator picks a new store
//! location.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use cacamba_locate::{GeoConfig, map::MAP_FILE_NAME};
use cacamba_store_csv::CsvStore;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_STORE_FILE_NAME: &str = "cacambas.csv";
pub const ENV_PREFIX: &str = "CACAMBA";

// ─── AppConfig ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Absolute path of the spreadsheet file.
  pub store_path:           Option<PathBuf>,
  pub map_file_name:        String,
  pub address_lookup_url:   String,
  pub geocoding_url:        String,
  pub user_agent:           String,
  pub request_interval_ms:  u64,
  pub request_timeout_secs: u64,
  /// Appended to geocoding queries. Empty disables the suffix.
  pub country:              String,
}

impl Default for AppConfig {
  fn default() -> Self {
    let geo = GeoConfig::default();
    Self {
      store_path:           None,
      map_file_name:        MAP_FILE_NAME.into(),
      address_lookup_url:   geo.address_lookup_url,
      geocoding_url:        geo.geocoding_url,
      user_agent:           geo.user_agent,
      request_interval_ms:  geo.request_interval.as_millis() as u64,
      request_timeout_secs: geo.timeout.as_secs(),
      country:              geo.country.unwrap_or_default(),
    }
  }
}

impl AppConfig {
  /// Read `path` (if present) layered under `CACAMBA_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Config::builder()
      .add_source(
        File::from(path.to_path_buf())
          .format(FileFormat::Json)
          .required(false),
      )
      .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()?
      .try_deserialize()
  }

  /// Write the settings to `path` as pretty-printed JSON.
  pub fn save(&self, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(self).context("serialising settings")?;
    std::fs::write(path, json)
      .with_context(|| format!("writing settings to {}", path.display()))?;
    Ok(())
  }

  pub fn geo_config(&self) -> GeoConfig {
    GeoConfig {
      address_lookup_url: self.address_lookup_url.clone(),
      geocoding_url:      self.geocoding_url.clone(),
      user_agent:         self.user_agent.clone(),
      request_interval:   Duration::from_millis(self.request_interval_ms),
      timeout:            Duration::from_secs(self.request_timeout_secs),
      country:            (!self.country.trim().is_empty()).then(|| self.country.clone()),
    }
  }
}

// ─── Store path resolution ───────────────────────────────────────────────────

/// Why the operator is being asked for a store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReason {
  /// No settings file exists yet.
  FirstRun,
  /// The configured store's directory no longer exists.
  Relocate { missing: PathBuf },
}

/// `cacambas.csv` in the settings file's directory.
pub fn default_store_path(config_path: &Path) -> PathBuf {
  match config_path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir.join(DEFAULT_STORE_FILE_NAME),
    _ => PathBuf::from(DEFAULT_STORE_FILE_NAME),
  }
}

/// Work out which store file to use, asking the operator when the settings
/// don't say or point somewhere that is gone.
///
/// `prompt` returns the chosen path, or `None` to accept the default.
/// Settings are rewritten whenever the store location changes, including a
/// fallback to the default after a cancelled relocation.
pub fn resolve_store_path(
  config_path: &Path,
  mut prompt: impl FnMut(&PromptReason) -> Option<PathBuf>,
) -> (AppConfig, PathBuf) {
  let fallback = default_store_path(config_path);

  if !config_path.exists() {
    let mut settings = AppConfig::load(config_path).unwrap_or_default();
    let store_path = prompt(&PromptReason::FirstRun).unwrap_or(fallback);
    settings.store_path = Some(store_path.clone());
    persist(&settings, config_path);
    info!(path = %store_path.display(), "first run, store location chosen");
    return (settings, store_path);
  }

  let mut settings = match AppConfig::load(config_path) {
    Ok(settings) => settings,
    Err(e) => {
      warn!(path = %config_path.display(), error = %e, "settings unreadable, using defaults");
      return (AppConfig::default(), fallback);
    }
  };

  let Some(configured) = settings.store_path.clone() else {
    warn!(path = %config_path.display(), "settings have no store_path, using default");
    return (settings, fallback);
  };

  if directory_exists(&configured) {
    return (settings, configured);
  }

  warn!(path = %configured.display(), "store directory no longer exists");
  match prompt(&PromptReason::Relocate { missing: configured }) {
    Some(chosen) => {
      settings.store_path = Some(chosen.clone());
      persist(&settings, config_path);
      (settings, chosen)
    }
    None => {
      settings.store_path = Some(fallback.clone());
      persist(&settings, config_path);
      (settings, fallback)
    }
  }
}

/// Open the store at `store_path`, or at the default location if that path
/// cannot be created. A fallback is written back to the settings.
pub async fn open_store(
  config_path: &Path,
  settings: &mut AppConfig,
  store_path: PathBuf,
) -> anyhow::Result<(CsvStore, PathBuf)> {
  let e = match CsvStore::open(store_path.clone()).await {
    Ok(store) => return Ok((store, store_path)),
    Err(e) => e,
  };

  let fallback = default_store_path(config_path);
  if fallback == store_path {
    return Err(e).with_context(|| format!("opening container store {}", store_path.display()));
  }
  warn!(
    path = %store_path.display(),
    fallback = %fallback.display(),
    error = %e,
    "cannot open store, using default location"
  );

  let store = CsvStore::open(fallback.clone())
    .await
    .with_context(|| format!("opening container store {}", fallback.display()))?;
  settings.store_path = Some(fallback.clone());
  persist(settings, config_path);
  Ok((store, fallback))
}

fn directory_exists(store_path: &Path) -> bool {
  match store_path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
    _ => true,
  }
}

fn persist(settings: &AppConfig, config_path: &Path) {
  if let Err(e) = settings.save(config_path) {
    warn!(error = %format!("{e:#}"), "could not save settings");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn never_asked(reason: &PromptReason) -> Option<PathBuf> {
    panic!("unexpected prompt: {reason:?}")
  }

  #[test]
  fn first_run_saves_the_chosen_path() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let chosen = dir.path().join("data").join("mine.csv");

    let mut reasons = Vec::new();
    let (settings, store_path) = resolve_store_path(&config_path, |reason| {
      reasons.push(reason.clone());
      Some(chosen.clone())
    });

    assert_eq!(reasons, vec![PromptReason::FirstRun]);
    assert_eq!(store_path, chosen);
    assert_eq!(settings.store_path.as_ref(), Some(&chosen));

    let saved = AppConfig::load(&config_path).unwrap();
    assert_eq!(saved.store_path, Some(chosen));
  }

  #[test]
  fn first_run_without_a_choice_uses_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);

    let (_, store_path) = resolve_store_path(&config_path, |_| None);

    assert_eq!(store_path, dir.path().join(DEFAULT_STORE_FILE_NAME));
    assert!(config_path.exists());
  }

  #[test]
  fn valid_configured_path_is_used_silently() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let store = dir.path().join("cacambas.csv");
    AppConfig { store_path: Some(store.clone()), ..AppConfig::default() }
      .save(&config_path)
      .unwrap();

    let (_, store_path) = resolve_store_path(&config_path, never_asked);

    assert_eq!(store_path, store);
  }

  #[test]
  fn vanished_directory_asks_for_a_new_location() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let gone = dir.path().join("gone").join("cacambas.csv");
    AppConfig { store_path: Some(gone.clone()), ..AppConfig::default() }
      .save(&config_path)
      .unwrap();
    let chosen = dir.path().join("moved.csv");

    let mut reasons = Vec::new();
    let (_, store_path) = resolve_store_path(&config_path, |reason| {
      reasons.push(reason.clone());
      Some(chosen.clone())
    });

    assert_eq!(reasons, vec![PromptReason::Relocate { missing: gone }]);
    assert_eq!(store_path, chosen);
    assert_eq!(AppConfig::load(&config_path).unwrap().store_path, Some(chosen));
  }

  #[test]
  fn cancelled_relocation_saves_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let gone = dir.path().join("gone").join("cacambas.csv");
    AppConfig { store_path: Some(gone), ..AppConfig::default() }
      .save(&config_path)
      .unwrap();

    let (_, store_path) = resolve_store_path(&config_path, |_| None);

    let fallback = dir.path().join(DEFAULT_STORE_FILE_NAME);
    assert_eq!(store_path, fallback);
    assert_eq!(AppConfig::load(&config_path).unwrap().store_path, Some(fallback));

    // The next launch uses the saved default without asking.
    let (_, again) = resolve_store_path(&config_path, never_asked);
    assert_eq!(again, dir.path().join(DEFAULT_STORE_FILE_NAME));
  }

  #[test]
  fn unreadable_settings_fall_back_to_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&config_path, "{ not json").unwrap();

    let (settings, store_path) = resolve_store_path(&config_path, never_asked);

    assert_eq!(store_path, dir.path().join(DEFAULT_STORE_FILE_NAME));
    assert_eq!(settings, AppConfig::default());
  }

  #[test]
  fn missing_key_falls_back_to_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&config_path, r#"{ "country": "Portugal" }"#).unwrap();

    let (settings, store_path) = resolve_store_path(&config_path, never_asked);

    assert_eq!(store_path, dir.path().join(DEFAULT_STORE_FILE_NAME));
    assert_eq!(settings.country, "Portugal");
    assert_eq!(settings.map_file_name, MAP_FILE_NAME);
  }

  #[test]
  fn geo_config_carries_service_settings() {
    let settings = AppConfig {
      request_interval_ms: 2500,
      country: "  ".into(),
      ..AppConfig::default()
    };
    let geo = settings.geo_config();

    assert_eq!(geo.request_interval, Duration::from_millis(2500));
    assert_eq!(geo.timeout, Duration::from_secs(30));
    assert_eq!(geo.country, None);
    assert_eq!(AppConfig::default().geo_config().country.as_deref(), Some("Brasil"));
  }

  #[tokio::test]
  async fn unopenable_store_falls_back_to_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let unreachable = dir.path().join("nao_existe").join("cacambas.csv");

    let (mut settings, store_path) =
      resolve_store_path(&config_path, |_| Some(unreachable.clone()));
    assert_eq!(store_path, unreachable);

    let (store, opened) = open_store(&config_path, &mut settings, store_path).await.unwrap();

    let fallback = dir.path().join(DEFAULT_STORE_FILE_NAME);
    assert_eq!(opened, fallback);
    assert_eq!(store.path(), fallback.as_path());
    assert!(fallback.exists());
    assert_eq!(settings.store_path.as_ref(), Some(&fallback));
    assert_eq!(AppConfig::load(&config_path).unwrap().store_path, Some(fallback));
  }

  #[tokio::test]
  async fn openable_store_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let chosen = dir.path().join("mine.csv");
    let mut settings = AppConfig { store_path: Some(chosen.clone()), ..AppConfig::default() };

    let (_, opened) = open_store(&config_path, &mut settings, chosen.clone()).await.unwrap();

    assert_eq!(opened, chosen);
    assert!(chosen.exists());
    assert!(!config_path.exists(), "settings untouched when nothing changed");
  }
}

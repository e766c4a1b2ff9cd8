//! [`CsvStore`], the spreadsheet implementation of [`ContainerStore`].

use std::{
  io::Write as _,
  path::{Path, PathBuf},
  sync::Arc,
};

use cacamba_core::{
  container::Container,
  store::{ContainerStore, Insertion},
};
use csv::StringRecord;
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{decode_container, encode_container},
  schema::{HEADER, IDENTIFIER},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A container store backed by a single CSV file.
///
/// Clones share the reference-counted path. There is no locking:
/// two processes mutating the same file can lose each other's writes.
#[derive(Debug, Clone)]
pub struct CsvStore {
  path: Arc<PathBuf>,
}

impl CsvStore {
  /// Open the store at `path`, creating an empty one if the file is missing.
  pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let store = Self::at(path);
    store.ensure_exists().await?;
    Ok(store)
  }

  /// Point at `path` without touching the filesystem.
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: Arc::new(path.into()) }
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Run `f` against the store path on the blocking pool.
  async fn blocking<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Path) -> Result<T> + Send + 'static,
  {
    let path = Arc::clone(&self.path);
    tokio::task::spawn_blocking(move || f(&path)).await?
  }
}

// ─── ContainerStore impl ─────────────────────────────────────────────────────

impl ContainerStore for CsvStore {
  type Error = Error;

  async fn ensure_exists(&self) -> Result<bool> {
    self
      .blocking(|path| {
        if path.exists() {
          return Ok(false);
        }
        write_rows(path, &[])?;
        info!(path = %path.display(), "created empty container store");
        Ok(true)
      })
      .await
  }

  async fn load_all(&self) -> Result<Vec<Container>> {
    self
      .blocking(|path| {
        let containers: Vec<Container> = read_rows(path)?
          .iter()
          .filter_map(decode_container)
          .collect();
        debug!(count = containers.len(), "loaded containers");
        Ok(containers)
      })
      .await
  }

  async fn save(&self, container: Container) -> Result<Insertion> {
    self
      .blocking(move |path| {
        let mut rows = read_rows(path)?;
        if rows.iter().any(|row| identifier_of(row) == container.identifier) {
          return Ok(Insertion::Duplicate);
        }
        rows.push(StringRecord::from(encode_container(&container).to_vec()));
        write_rows(path, &rows)?;
        Ok(Insertion::Inserted)
      })
      .await
  }

  async fn remove(&self, identifier: &str) -> Result<Option<Container>> {
    if identifier.trim().is_empty() {
      return Ok(None);
    }
    let identifier = identifier.to_owned();

    self
      .blocking(move |path| {
        let mut rows = read_rows(path)?;
        let Some(index) = rows.iter().position(|row| identifier_of(row) == identifier)
        else {
          return Ok(None);
        };
        let removed = rows.remove(index);
        write_rows(path, &rows)?;
        Ok(decode_container(&removed))
      })
      .await
  }
}

// ─── File access ─────────────────────────────────────────────────────────────

fn identifier_of(row: &StringRecord) -> &str {
  row.get(IDENTIFIER).unwrap_or_default()
}

/// Every data row, header excluded, exactly as stored.
fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
  let bytes = std::fs::read(path)
    .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;

  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .delimiter(sniff_delimiter(&bytes))
    .from_reader(bytes.as_slice());

  let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
  Ok(rows)
}

/// `;` when the header row uses it and has no commas, as spreadsheet apps
/// do when saving CSV under a pt-BR locale. Otherwise `,`.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
  let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
  if header.contains(&b';') && !header.contains(&b',') { b';' } else { b',' }
}

/// Replace the file with the header followed by `rows`.
///
/// Writes to a temporary sibling and renames it into place, so a failure
/// part-way leaves the previous file untouched.
fn write_rows(path: &Path, rows: &[StringRecord]) -> Result<()> {
  let io_err = |source| Error::Io { path: path.to_path_buf(), source };

  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;

  {
    let mut writer = csv::WriterBuilder::new()
      .flexible(true)
      .from_writer(&mut tmp);
    writer.write_record(HEADER)?;
    for row in rows {
      writer.write_record(row)?;
    }
    writer.flush().map_err(io_err)?;
  }
  tmp.flush().map_err(io_err)?;
  tmp.as_file().sync_all().map_err(io_err)?;

  tmp.persist(path)?;
  Ok(())
}

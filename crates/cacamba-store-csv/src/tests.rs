//! Integration tests for `CsvStore` against files in a scratch directory.

use cacamba_core::{
  container::{Address, Container, Coordinates},
  store::{ContainerStore, Insertion},
};
use tempfile::TempDir;

use crate::{CsvStore, HEADER};

async fn store() -> (TempDir, CsvStore) {
  let dir = tempfile::tempdir().expect("tempdir");
  let store = CsvStore::open(dir.path().join("cacambas.csv"))
    .await
    .expect("open store");
  (dir, store)
}

fn container(identifier: &str, placement_date: &str) -> Container {
  Container {
    identifier:     identifier.into(),
    postal_code:    "20000-000".into(),
    street_number:  "42".into(),
    placement_date: placement_date.into(),
    address:        Address {
      street:       "Rua da Assembleia".into(),
      neighborhood: "Centro".into(),
      city:         "Rio de Janeiro".into(),
      region:       "RJ".into(),
    },
    coordinates:    Some(Coordinates { latitude: -22.9035, longitude: -43.1766 }),
  }
}

fn file_text(store: &CsvStore) -> String {
  std::fs::read_to_string(store.path()).expect("read store file")
}

// ─── Creation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_creates_header_only_file() {
  let (_dir, s) = store().await;

  assert_eq!(file_text(&s), format!("{}\n", HEADER.join(",")));
  assert!(s.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn ensure_exists_is_idempotent() {
  let (_dir, s) = store().await;
  s.save(container("C1", "01/01/2020")).await.unwrap();

  assert!(!s.ensure_exists().await.unwrap());
  assert_eq!(s.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn ensure_exists_reports_creation() {
  let dir = tempfile::tempdir().unwrap();
  let s = CsvStore::at(dir.path().join("new.csv"));

  assert!(s.ensure_exists().await.unwrap());
  assert!(!s.ensure_exists().await.unwrap());
}

#[tokio::test]
async fn missing_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = CsvStore::at(dir.path().join("absent.csv"));

  assert!(s.load_all().await.is_err());
}

// ─── Save ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_then_load_single_record() {
  let (_dir, s) = store().await;

  let outcome = s.save(container("C1", "01/01/2020")).await.unwrap();
  assert_eq!(outcome, Insertion::Inserted);

  let all = s.load_all().await.unwrap();
  assert_eq!(all, vec![container("C1", "01/01/2020")]);
  assert!(all[0].needs_pickup());
}

#[tokio::test]
async fn save_preserves_insertion_order() {
  let (_dir, s) = store().await;
  for id in ["C3", "C1", "C2"] {
    s.save(container(id, "01/01/2020")).await.unwrap();
  }

  let ids: Vec<_> = s
    .load_all()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.identifier)
    .collect();
  assert_eq!(ids, vec!["C3", "C1", "C2"]);
}

#[tokio::test]
async fn duplicate_identifier_leaves_file_unchanged() {
  let (_dir, s) = store().await;
  s.save(container("C1", "01/01/2020")).await.unwrap();
  let before = file_text(&s);

  let outcome = s.save(container("C1", "05/05/2024")).await.unwrap();

  assert_eq!(outcome, Insertion::Duplicate);
  assert_eq!(file_text(&s), before);
}

#[tokio::test]
async fn record_without_coordinates_round_trips() {
  let (_dir, s) = store().await;
  let mut c = container("C1", "01/01/2020");
  c.coordinates = None;
  s.save(c.clone()).await.unwrap();

  assert_eq!(s.load_all().await.unwrap(), vec![c]);
}

#[tokio::test]
async fn fields_with_commas_and_quotes_survive() {
  let (_dir, s) = store().await;
  let mut c = container("C1", "01/01/2020");
  c.address.street = "Rua \"Nova\", trecho 2".into();
  s.save(c.clone()).await.unwrap();

  assert_eq!(s.load_all().await.unwrap(), vec![c]);
}

// ─── Remove ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_deletes_only_the_match() {
  let (_dir, s) = store().await;
  for id in ["C1", "C2", "C3"] {
    s.save(container(id, "01/01/2020")).await.unwrap();
  }

  let removed = s.remove("C2").await.unwrap();
  assert_eq!(removed.map(|c| c.identifier).as_deref(), Some("C2"));

  let ids: Vec<_> = s
    .load_all()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.identifier)
    .collect();
  assert_eq!(ids, vec!["C1", "C3"]);
}

#[tokio::test]
async fn remove_unknown_identifier_is_a_no_op() {
  let (_dir, s) = store().await;
  s.save(container("C1", "01/01/2020")).await.unwrap();
  let before = file_text(&s);

  assert!(s.remove("C9").await.unwrap().is_none());
  assert!(s.remove("").await.unwrap().is_none());
  assert_eq!(file_text(&s), before);
}

// ─── Hand-edited files ───────────────────────────────────────────────────────

#[tokio::test]
async fn tolerates_blank_and_short_rows() {
  let (_dir, s) = store().await;
  let text = format!(
    "{}\nC1,20000-000,42,01/01/2020,Rua A,Centro,Rio,RJ,-22.9,-43.1\n,,,,\nC2,01001-000\n",
    HEADER.join(",")
  );
  std::fs::write(s.path(), text).unwrap();

  let all = s.load_all().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[1].identifier, "C2");
  assert_eq!(all[1].coordinates, None);
}

#[tokio::test]
async fn mutation_keeps_rows_it_cannot_decode() {
  let (_dir, s) = store().await;
  let text = format!(
    "{}\nC1,20000-000,42,01/01/2020\n,,,,note left by hand\n",
    HEADER.join(",")
  );
  std::fs::write(s.path(), text).unwrap();

  s.save(container("C2", "01/01/2020")).await.unwrap();

  assert!(file_text(&s).contains("note left by hand"));
  assert_eq!(s.load_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn reads_semicolon_delimited_export() {
  let (_dir, s) = store().await;
  let text = format!(
    "{}\r\nC1;20000-000;42;01/01/2020;Rua A, fundos;Centro;Rio;RJ;-22,9;-43,1\r\n",
    HEADER.join(";")
  );
  std::fs::write(s.path(), text).unwrap();

  let all = s.load_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].address.street, "Rua A, fundos");
  assert_eq!(all[0].coordinates, Some(Coordinates { latitude: -22.9, longitude: -43.1 }));

  s.save(container("C2", "01/01/2020")).await.unwrap();
  assert!(file_text(&s).starts_with(&HEADER.join(",")));
  assert_eq!(s.load_all().await.unwrap().len(), 2);
}

//! Conversions between [`Container`] and spreadsheet rows.
//!
//! Every cell is plain text. Coordinates are written with Rust's shortest
//! round-trip float formatting and left empty when absent.

use cacamba_core::container::{Address, Container, Coordinates};
use csv::StringRecord;
use tracing::warn;

use crate::schema::{
  CITY, COLUMNS, IDENTIFIER, LATITUDE, LONGITUDE, NEIGHBORHOOD, PLACEMENT_DATE,
  POSTAL_CODE, REGION, STREET, STREET_NUMBER,
};

// ─── Encode ──────────────────────────────────────────────────────────────────

pub fn encode_container(c: &Container) -> [String; COLUMNS] {
  let (latitude, longitude) = match c.coordinates {
    Some(Coordinates { latitude, longitude }) => {
      (latitude.to_string(), longitude.to_string())
    }
    None => (String::new(), String::new()),
  };

  [
    c.identifier.clone(),
    c.postal_code.clone(),
    c.street_number.clone(),
    c.placement_date.clone(),
    c.address.street.clone(),
    c.address.neighborhood.clone(),
    c.address.city.clone(),
    c.address.region.clone(),
    latitude,
    longitude,
  ]
}

// ─── Decode ──────────────────────────────────────────────────────────────────

/// Decode one data row. Rows without an identifier are blank lines left by
/// spreadsheet editors and decode to `None`.
///
/// Short rows are tolerated: missing cells read as empty.
pub fn decode_container(record: &StringRecord) -> Option<Container> {
  let cell = |i: usize| record.get(i).unwrap_or_default().to_owned();

  let identifier = cell(IDENTIFIER);
  if identifier.trim().is_empty() {
    return None;
  }

  let coordinates = decode_coordinates(
    &identifier,
    record.get(LATITUDE).unwrap_or_default(),
    record.get(LONGITUDE).unwrap_or_default(),
  );

  Some(Container {
    postal_code: cell(POSTAL_CODE),
    street_number: cell(STREET_NUMBER),
    placement_date: cell(PLACEMENT_DATE),
    address: Address {
      street:       cell(STREET),
      neighborhood: cell(NEIGHBORHOOD),
      city:         cell(CITY),
      region:       cell(REGION),
    },
    coordinates,
    identifier,
  })
}

/// Both cells must hold a float, otherwise the pair is treated as absent.
fn decode_coordinates(
  identifier: &str,
  latitude: &str,
  longitude: &str,
) -> Option<Coordinates> {
  let (latitude, longitude) = (latitude.trim(), longitude.trim());
  if latitude.is_empty() && longitude.is_empty() {
    return None;
  }

  match (parse_degrees(latitude), parse_degrees(longitude)) {
    (Ok(latitude), Ok(longitude)) => Some(Coordinates { latitude, longitude }),
    _ => {
      warn!(
        identifier,
        latitude, longitude, "ignoring incomplete or unreadable coordinates"
      );
      None
    }
  }
}

/// Accepts a decimal comma (`-22,9035`) as well as a point.
fn parse_degrees(value: &str) -> Result<f64, std::num::ParseFloatError> {
  value.replacen(',', ".", 1).parse()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(cells: &[&str]) -> StringRecord { StringRecord::from(cells.to_vec()) }

  #[test]
  fn decodes_full_row() {
    let c = decode_container(&row(&[
      "C1", "20000-000", "42", "01/01/2020", "Rua A", "Centro", "Rio", "RJ",
      "-22.9068", "-43.1729",
    ]))
    .unwrap();

    assert_eq!(c.identifier, "C1");
    assert_eq!(c.address.city, "Rio");
    assert_eq!(
      c.coordinates,
      Some(Coordinates { latitude: -22.9068, longitude: -43.1729 })
    );
  }

  #[test]
  fn decimal_comma_coordinates_are_read() {
    let c = decode_container(&row(&[
      "C1", "", "", "", "", "", "", "", "-22,9068", "-43,1729",
    ]))
    .unwrap();
    assert_eq!(
      c.coordinates,
      Some(Coordinates { latitude: -22.9068, longitude: -43.1729 })
    );
  }

  #[test]
  fn blank_identifier_is_skipped() {
    assert!(decode_container(&row(&["", "20000-000"])).is_none());
    assert!(decode_container(&row(&["   "])).is_none());
  }

  #[test]
  fn short_row_reads_missing_cells_as_empty() {
    let c = decode_container(&row(&["C2", "20000-000"])).unwrap();
    assert_eq!(c.street_number, "");
    assert_eq!(c.address, Address::default());
    assert_eq!(c.coordinates, None);
  }

  #[test]
  fn half_a_coordinate_pair_is_absent() {
    let mut cells = vec!["C3", "", "", "", "", "", "", "", "-22.9", ""];
    assert_eq!(decode_container(&row(&cells)).unwrap().coordinates, None);

    cells[9] = "west";
    assert_eq!(decode_container(&row(&cells)).unwrap().coordinates, None);
  }

  #[test]
  fn encoded_coordinates_read_back_exactly() {
    let original = Container {
      identifier:     "C4".into(),
      postal_code:    "01001-000".into(),
      street_number:  "1".into(),
      placement_date: "15/07/2024".into(),
      address:        Address {
        street:       "Praça da Sé".into(),
        neighborhood: "Sé".into(),
        city:         "São Paulo".into(),
        region:       "SP".into(),
      },
      coordinates:    Some(Coordinates {
        latitude:  -23.550_519_1,
        longitude: -46.633_309_4,
      }),
    };

    let cells = encode_container(&original);
    assert_eq!(cells[LATITUDE], "-23.5505191");
    let decoded = decode_container(&StringRecord::from(cells.to_vec())).unwrap();
    assert_eq!(decoded, original);
  }

  #[test]
  fn absent_coordinates_encode_as_empty_cells() {
    let c = decode_container(&row(&["C5"])).unwrap();
    let cells = encode_container(&c);
    assert_eq!(cells[LATITUDE], "");
    assert_eq!(cells[LONGITUDE], "");
  }
}

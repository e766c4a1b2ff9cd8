//! Column layout of the container spreadsheet.
//!
//! Columns are addressed by position; the header row is written once when
//! the file is created and skipped on read. The header keeps the names used
//! by existing spreadsheets.

/// Header row, in column order.
pub const HEADER: [&str; COLUMNS] = [
  "Numero",         // identifier
  "CEP",            // postal code
  "adnumero",       // street number
  "data_colocacao", // placement date, dd/mm/yyyy
  "Rua",            // street
  "Bairro",         // neighborhood
  "Cidade",         // city
  "UF",             // region
  "latitude",
  "longitude",
];

pub const COLUMNS: usize = 10;

pub const IDENTIFIER: usize = 0;
pub const POSTAL_CODE: usize = 1;
pub const STREET_NUMBER: usize = 2;
pub const PLACEMENT_DATE: usize = 3;
pub const STREET: usize = 4;
pub const NEIGHBORHOOD: usize = 5;
pub const CITY: usize = 6;
pub const REGION: usize = 7;
pub const LATITUDE: usize = 8;
pub const LONGITUDE: usize = 9;

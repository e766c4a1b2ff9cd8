//! Spreadsheet (CSV) backend for the caçamba store.
//!
//! The whole file is read on every operation and rewritten on every
//! mutation. Blocking file I/O runs on tokio's blocking pool so callers on
//! the async runtime are never stalled.
//!
//! Only delimited text is understood. Workbooks (`.xlsx`) must be exported
//! to CSV first. Files whose header row is separated by `;` (the usual
//! pt-BR export) are read with that delimiter, and coordinates may use a
//! decimal comma. Every write produces a comma-delimited file.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::HEADER;
pub use store::CsvStore;

#[cfg(test)]
mod tests;

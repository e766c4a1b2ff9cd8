//! Placement-date normalisation.
//!
//! Operators type dates in a handful of shorthand shapes. All of them are
//! folded into the canonical `dd/mm/yyyy` form before a record is stored:
//!
//! | Input        | Shape       |
//! |--------------|-------------|
//! | `05/03/24`   | `dd/mm/yy`  |
//! | `05/03/2024` | `dd/mm/yyyy`|
//! | `050324`     | `ddmmyy`    |
//! | `05032024`   | `ddmmyyyy`  |
//!
//! Anything else is rejected, including single-digit day or month groups.

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result};

/// `chrono` format string of the stored placement date.
pub const CANONICAL_FORMAT: &str = "%d/%m/%Y";

/// Two-digit years below this value land in the 2000s, the rest in the 1900s.
/// Same pivot as chrono's (and POSIX `strptime`'s) `%y`.
const CENTURY_PIVOT: i32 = 69;

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse operator input in any accepted shape into a calendar date.
pub fn parse(input: &str) -> Result<NaiveDate> {
  let reject = |reason| Error::InvalidDate {
    input: input.to_owned(),
    reason,
  };

  if input.is_empty() {
    return Err(reject("empty input"));
  }
  if !input.chars().all(|c| c.is_ascii_digit() || c == '/') {
    return Err(reject("only digits and '/' are accepted"));
  }

  let (day, month, year) = if input.contains('/') {
    let parts: Vec<&str> = input.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
      return Err(reject("expected exactly two '/' separators"));
    };
    if day.len() != 2 || month.len() != 2 {
      return Err(reject("day and month must have two digits"));
    }
    if year.len() != 2 && year.len() != 4 {
      return Err(reject("year must have two or four digits"));
    }
    (*day, *month, *year)
  } else {
    match input.len() {
      6 => (&input[0..2], &input[2..4], &input[4..6]),
      8 => (&input[0..2], &input[2..4], &input[4..8]),
      _ => return Err(reject("expected 6 or 8 digits without separators")),
    }
  };

  let day: u32 = day.parse().map_err(|_| reject("unreadable day"))?;
  let month: u32 = month.parse().map_err(|_| reject("unreadable month"))?;
  let year = expand_year(year).ok_or_else(|| reject("unreadable year"))?;

  NaiveDate::from_ymd_opt(year, month, day)
    .filter(|date| date.year() >= 1)
    .ok_or_else(|| reject("not a calendar date"))
}

/// Normalise operator input to the canonical `dd/mm/yyyy` string.
pub fn normalize(input: &str) -> Result<String> { parse(input).map(format) }

/// Render a date in the canonical stored form.
pub fn format(date: NaiveDate) -> String {
  date.format(CANONICAL_FORMAT).to_string()
}

/// Parse a stored (canonical) placement date. Returns `None` on anything
/// that is not `dd/mm/yyyy`.
pub fn parse_canonical(stored: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(stored, CANONICAL_FORMAT).ok()
}

fn expand_year(digits: &str) -> Option<i32> {
  let value: i32 = digits.parse().ok()?;
  match digits.len() {
    2 if value < CENTURY_PIVOT => Some(2000 + value),
    2 => Some(1900 + value),
    _ => Some(value),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn accepts_all_four_shapes() {
    assert_eq!(parse("05/03/24").unwrap(), ymd(2024, 3, 5));
    assert_eq!(parse("05/03/2024").unwrap(), ymd(2024, 3, 5));
    assert_eq!(parse("050324").unwrap(), ymd(2024, 3, 5));
    assert_eq!(parse("05032024").unwrap(), ymd(2024, 3, 5));
  }

  #[test]
  fn canonical_input_round_trips() {
    for s in ["01/01/2020", "29/02/2024", "31/12/1999", "15/07/2031"] {
      assert_eq!(normalize(s).unwrap(), s);
    }
  }

  #[test]
  fn shorthand_is_reemitted_canonically() {
    assert_eq!(normalize("010120").unwrap(), "01/01/2020");
    assert_eq!(normalize("31121999").unwrap(), "31/12/1999");
    assert_eq!(normalize("07/08/09").unwrap(), "07/08/2009");
  }

  #[test]
  fn two_digit_years_pivot_at_69() {
    assert_eq!(parse("01/01/68").unwrap().year(), 2068);
    assert_eq!(parse("01/01/69").unwrap().year(), 1969);
    assert_eq!(parse("01/01/00").unwrap().year(), 2000);
    assert_eq!(parse("01/01/99").unwrap().year(), 1999);
    assert_eq!(parse("010168").unwrap().year(), 2068);
    assert_eq!(parse("010169").unwrap().year(), 1969);
  }

  #[test]
  fn rejects_malformed_input() {
    let rejected = [
      "",
      "32/01/2024",   // day out of range
      "01-01-24",     // wrong separator
      "1/1/24",       // single-digit groups
      "01/1/24",
      "01/01/024",    // three-digit year
      "01/01/20245",
      "01/01/2024/",  // three separators
      "01//2024",
      "0101245",      // seven digits
      "01012",
      "010124 ",      // trailing space
      " 01/01/24",
      "31/04/2024",   // April has 30 days
      "29/02/2023",   // not a leap year
      "01/13/2024",
      "00/01/2024",
      "01/01/0000",
      "99/99/9999",
      "ab/cd/efgh",
    ];
    for input in rejected {
      assert!(
        matches!(parse(input), Err(Error::InvalidDate { .. })),
        "{input:?} should be rejected"
      );
    }
  }

  #[test]
  fn rejection_names_the_input() {
    let err = normalize("01-01-24").unwrap_err();
    assert!(err.to_string().contains("01-01-24"));
  }

  #[test]
  fn parse_canonical_only_reads_stored_form() {
    assert_eq!(parse_canonical("05/03/2024"), Some(ymd(2024, 3, 5)));
    assert_eq!(parse_canonical("not a date"), None);
    assert_eq!(parse_canonical(""), None);
  }
}

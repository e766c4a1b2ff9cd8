//! ViaCEP postal-code directory wire format.
//!
//! `GET {base}/ws/{cep}/json/` answers either the address fields or
//! `{"erro": true}` (older deployments send the string `"true"`).

use cacamba_core::container::Address;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct ViaCepResponse {
  #[serde(default)]
  logradouro: String,
  #[serde(default)]
  bairro:     String,
  #[serde(default)]
  localidade: String,
  #[serde(default)]
  uf:         String,
  #[serde(default)]
  erro:       Option<Value>,
}

impl ViaCepResponse {
  /// The address, unless the directory flagged the code as unknown.
  pub fn into_address(self) -> Option<Address> {
    let flagged = match &self.erro {
      None | Some(Value::Null) | Some(Value::Bool(false)) => false,
      Some(Value::String(s)) => s != "false",
      Some(_) => true,
    };
    if flagged {
      return None;
    }

    Some(Address {
      street:       self.logradouro,
      neighborhood: self.bairro,
      city:         self.localidade,
      region:       self.uf,
    })
  }
}

/// `{base}/ws/{postal_code}/json/`, with the code percent-encoded as a path
/// segment.
pub fn lookup_url(base: &str, postal_code: &str) -> Result<Url> {
  let mut url = Url::parse(base).map_err(|e| Error::BaseUrl {
    url:    base.to_owned(),
    reason: e.to_string(),
  })?;
  url
    .path_segments_mut()
    .map_err(|()| Error::BaseUrl {
      url:    base.to_owned(),
      reason: "cannot be a base".into(),
    })?
    .pop_if_empty()
    .extend(["ws", postal_code, "json", ""]);
  Ok(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decode(json: &str) -> Option<Address> {
    serde_json::from_str::<ViaCepResponse>(json)
      .unwrap()
      .into_address()
  }

  #[test]
  fn decodes_found_address() {
    let address = decode(
      r#"{
        "cep": "20010-000",
        "logradouro": "Praça Quinze de Novembro",
        "complemento": "",
        "bairro": "Centro",
        "localidade": "Rio de Janeiro",
        "uf": "RJ",
        "ibge": "3304557"
      }"#,
    )
    .unwrap();

    assert_eq!(address.street, "Praça Quinze de Novembro");
    assert_eq!(address.neighborhood, "Centro");
    assert_eq!(address.city, "Rio de Janeiro");
    assert_eq!(address.region, "RJ");
  }

  #[test]
  fn erro_flag_means_not_found() {
    assert!(decode(r#"{"erro": true}"#).is_none());
    assert!(decode(r#"{"erro": "true"}"#).is_none());
  }

  #[test]
  fn false_erro_flag_is_ignored() {
    assert!(decode(r#"{"erro": false, "localidade": "Niterói", "uf": "RJ"}"#).is_some());
  }

  #[test]
  fn city_wide_codes_have_empty_street() {
    let address =
      decode(r#"{"logradouro": "", "bairro": "", "localidade": "Búzios", "uf": "RJ"}"#)
        .unwrap();
    assert_eq!(address.street, "");
    assert_eq!(address.city, "Búzios");
  }

  #[test]
  fn url_places_code_between_fixed_segments() {
    let url = lookup_url("https://viacep.com.br", "20010-000").unwrap();
    assert_eq!(url.as_str(), "https://viacep.com.br/ws/20010-000/json/");

    let url = lookup_url("http://localhost:8080/", "20010000").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/ws/20010000/json/");
  }

  #[test]
  fn url_escapes_raw_input() {
    let url = lookup_url("https://viacep.com.br", "200/10 000").unwrap();
    assert_eq!(url.as_str(), "https://viacep.com.br/ws/200%2F10%20000/json/");
  }

  #[test]
  fn bad_base_url_is_reported() {
    assert!(matches!(
      lookup_url("not a url", "20010000"),
      Err(Error::BaseUrl { .. })
    ));
  }
}

//! Request contract of the tracking service.
//!
//! Transport lives in the front ends (reqwest in the terminal app, `fetch`
//! in the browser); this module owns paths, query parameters and body
//! interpretation so both behave the same.

use serde_json::Value;
use thiserror::Error;

use crate::sample::Identifier;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SPECIES: &str = "anser";

pub const IDENTIFIERS_PATH: &str = "get_bird_ids";
pub const TRAJECTORY_PATH: &str = "get_trajectory_data";

pub const SPECIES_PARAM: &str = "bird";
pub const IDENTIFIER_PARAM: &str = "birdID";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
    #[error("expected a JSON array of {expected}, got {found}")]
    NotAnArray {
        expected: &'static str,
        found: &'static str,
    },
}

/// Base address plus the species every request is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    species: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>, species: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            species: species.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn species(&self) -> &str {
        &self.species
    }

    pub fn identifiers_url(&self) -> String {
        format!("{}/{IDENTIFIERS_PATH}", self.base_url)
    }

    pub fn identifiers_query(&self) -> Vec<(&'static str, String)> {
        vec![(SPECIES_PARAM, self.species.clone())]
    }

    pub fn trajectory_url(&self) -> String {
        format!("{}/{TRAJECTORY_PATH}", self.base_url)
    }

    pub fn trajectory_query(&self, identifier: &Identifier) -> Vec<(&'static str, String)> {
        vec![
            (SPECIES_PARAM, self.species.clone()),
            (IDENTIFIER_PARAM, identifier.to_string()),
        ]
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_SPECIES)
    }
}

/// Interprets an identifier-list body. Elements that are neither strings nor
/// numbers are skipped.
pub fn parse_identifiers(body: Value) -> Result<Vec<Identifier>, FetchError> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            return Err(FetchError::NotAnArray {
                expected: "identifiers",
                found: json_kind(&other),
            })
        }
    };

    let identifiers = items
        .iter()
        .filter_map(|item| {
            let identifier = Identifier::from_json(item);
            if identifier.is_none() {
                log::warn!("Skipping identifier of type {}: {item}", json_kind(item));
            }
            identifier
        })
        .collect();

    Ok(identifiers)
}

/// Interprets a trajectory body. Records stay raw; validation happens when
/// the map is drawn.
pub fn parse_trajectory(body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(records) => Ok(records),
        other => Err(FetchError::NotAnArray {
            expected: "trajectory records",
            found: json_kind(&other),
        }),
    }
}

pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trajectory_query_carries_species_and_identifier() {
        let endpoints = Endpoints::new("http://localhost:5000/", "anser");
        assert_eq!(
            endpoints.trajectory_url(),
            "http://localhost:5000/get_trajectory_data"
        );
        assert_eq!(
            endpoints.trajectory_query(&Identifier::from("A1")),
            vec![("bird", "anser".to_string()), ("birdID", "A1".to_string())]
        );
    }

    #[test]
    fn identifiers_request_is_scoped_to_species() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.identifiers_url(), "http://localhost:5000/get_bird_ids");
        assert_eq!(
            endpoints.identifiers_query(),
            vec![("bird", "anser".to_string())]
        );
    }

    #[test]
    fn identifier_list_keeps_order_and_skips_non_scalars() {
        let parsed = parse_identifiers(json!(["A2", 17, null, "A1"]));
        assert_eq!(
            parsed.map(|ids| ids.iter().map(ToString::to_string).collect::<Vec<_>>()),
            Ok(vec!["A2".to_string(), "17".to_string(), "A1".to_string()])
        );
    }

    #[test]
    fn non_array_bodies_are_rejected() {
        assert_eq!(
            parse_identifiers(json!({"error": "unknown bird"})),
            Err(FetchError::NotAnArray {
                expected: "identifiers",
                found: "an object",
            })
        );
        assert!(parse_trajectory(json!("oops")).is_err());
        assert_eq!(parse_trajectory(json!([])), Ok(Vec::new()));
    }
}

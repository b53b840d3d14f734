//! Portal request/response types

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

/// Default page (category) id sent with record searches.
pub const DEFAULT_PAGE_ID: &str = "1";

/// Administrative unit (UAT) of a county, read out of a [`UnitsListing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// Portal location id; sent back as `lid` when searching a record.
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Cadastral record search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub county: String,
    pub city_name: String,
    /// City id as returned by `list_units`, used directly as the location id.
    pub city_id: String,
    pub record_number: String,
    pub page_id: String,
}

impl RecordQuery {
    pub fn new(
        county: impl Into<String>,
        city_name: impl Into<String>,
        city_id: impl Into<String>,
        record_number: impl Into<String>,
    ) -> Self {
        Self {
            county: county.into(),
            city_name: city_name.into(),
            city_id: city_id.into(),
            record_number: record_number.into(),
            page_id: DEFAULT_PAGE_ID.to_string(),
        }
    }

    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = page_id.into();
        self
    }

    /// `application/x-www-form-urlencoded` body for `POST /ajax/searchCF/{token}`.
    ///
    /// Field order is fixed: `jud`, `uat`, `pid`, `lid`, `cf`, `cad` (always empty).
    pub fn form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("jud", &self.county)
            .append_pair("uat", &self.city_name)
            .append_pair("pid", &self.page_id)
            .append_pair("lid", &self.city_id)
            .append_pair("cf", &self.record_number)
            .append_pair("cad", "")
            .finish()
    }
}

/// Successful `list_units` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitsListing {
    /// `cities` exactly as the portal returned it.
    pub cities: serde_json::Value,
    pub token: String,
}

impl UnitsListing {
    /// First entry named `name` that has a usable `value`.
    pub fn find_city(&self, name: &str) -> Option<City> {
        self.cities
            .as_array()?
            .iter()
            .filter(|entry| entry.get("name").and_then(|n| n.as_str()) == Some(name))
            .find_map(|entry| serde_json::from_value(entry.clone()).ok())
    }
}

/// Successful `query_record` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordLookup {
    /// Portal response, passed through untouched.
    pub data: serde_json::Value,
    pub city: String,
    pub lid: String,
    pub token: String,
}

/// Result of a portal operation.
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure { error: String },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(payload) => Some(payload),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { error } => Some(error.as_str()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Outcome::Success(payload) => Ok(payload),
            Outcome::Failure { error } => Err(error),
        }
    }
}

impl<T> From<Result<T, ScraperError>> for Outcome<T> {
    fn from(result: Result<T, ScraperError>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => Outcome::Failure {
                error: e.to_string(),
            },
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Success<'a, T> {
            success: bool,
            #[serde(flatten)]
            payload: &'a T,
        }

        #[derive(Serialize)]
        struct Failure<'a> {
            success: bool,
            error: &'a str,
        }

        match self {
            Outcome::Success(payload) => Success {
                success: true,
                payload,
            }
            .serialize(serializer),
            Outcome::Failure { error } => Failure {
                success: false,
                error: error.as_str(),
            }
            .serialize(serializer),
        }
    }
}

//! ANCPI portal client
//!
//! Every operation loads the homepage first to read a fresh `stoken`, then
//! calls the AJAX endpoint that needs it. A record search ends the lookup
//! flow, so the session is dropped afterwards and the next operation starts
//! with an empty cookie jar. Listing units leaves the session alone.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use crate::config::PortalConfig;
use crate::error::ScraperError;
use crate::session::{Session, SessionManager};
use crate::token::{extract_token, Token};

use super::types::{Outcome, RecordLookup, RecordQuery, UnitsListing};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

#[derive(Debug)]
pub struct AncpiClient {
    sessions: SessionManager,
}

impl AncpiClient {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            sessions: SessionManager::new(config),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        self.sessions.config()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Force the next operation to start from a new session.
    pub async fn invalidate_session(&self) {
        self.sessions.invalidate().await;
    }

    /// List the administrative units of `county`.
    pub async fn list_units(&self, county: &str) -> Outcome<UnitsListing> {
        info!("Listing administrative units: county={}", county);

        let result = self.try_list_units(county).await;
        match &result {
            Ok(listing) => info!(
                "Units listed: county={}, cities={}",
                county,
                listing.cities.as_array().map_or(0, Vec::len)
            ),
            Err(e) => warn!("Listing units failed: county={}, error={}", county, e),
        }
        result.into()
    }

    /// Search a cadastral record, then discard the session.
    pub async fn query_record(&self, query: &RecordQuery) -> Outcome<RecordLookup> {
        info!(
            "Querying cadastral record: county={}, city={}, record={}",
            query.county, query.city_name, query.record_number
        );

        let result = self.try_query_record(query).await;
        match &result {
            Ok(_) => info!("Record query completed: record={}", query.record_number),
            Err(e) => warn!(
                "Record query failed: record={}, error={}",
                query.record_number, e
            ),
        }
        result.into()
    }

    async fn try_list_units(&self, county: &str) -> Result<UnitsListing, ScraperError> {
        let mut guard = self.sessions.lock().await;
        let session = guard.get_or_create()?;
        let token = self.fetch_token(session).await?;

        let url = self
            .config()
            .endpoint(&["ajax", "uats", county, token.as_str()])?;
        debug!("GET units: {}", url);

        let body = session
            .client()
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let mut parsed: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ScraperError::UpstreamData(format!("units response: {}", e)))?;
        // Passed through as sent; only its presence is checked.
        let cities = match parsed.get_mut("cities").map(serde_json::Value::take) {
            Some(cities) if !cities.is_null() => cities,
            _ => {
                return Err(ScraperError::UpstreamData(
                    "units response has no `cities`".into(),
                ))
            }
        };

        Ok(UnitsListing {
            cities,
            token: token.into_inner(),
        })
    }

    async fn try_query_record(&self, query: &RecordQuery) -> Result<RecordLookup, ScraperError> {
        let mut guard = self.sessions.lock().await;
        let session = guard.get_or_create()?;
        let token = self.fetch_token(session).await?;

        let url = self
            .config()
            .endpoint(&["ajax", "searchCF", token.as_str()])?;
        let form = query.form_body();
        debug!("POST record search: {} form={}", url, form);

        let response = session
            .client()
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form)
            .send()
            .await;

        // The search has reached the portal; its token must not be reused.
        guard.invalidate();

        let body = response?.error_for_status()?.text().await?;
        let data = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => value,
            Err(_) => serde_json::Value::String(body),
        };

        Ok(RecordLookup {
            data,
            city: query.city_name.clone(),
            lid: query.city_id.clone(),
            token: token.into_inner(),
        })
    }

    /// Load the homepage through `session` and read its `stoken`.
    pub async fn fetch_token(&self, session: &Session) -> Result<Token, ScraperError> {
        let url = self.config().base_url.clone();
        debug!(
            "GET homepage for token: {} (session generation={})",
            url,
            session.generation()
        );

        let html = session
            .client()
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let token = extract_token(&html)?;
        debug!("Token acquired: {}", token);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_new_has_no_session() {
        let client = AncpiClient::new(PortalConfig::default());
        assert_eq!(client.sessions().generation(), 0);
        assert_eq!(client.config().base_url.as_str(), "https://cf.ro/");

        client.invalidate_session().await;
        assert_eq!(client.sessions().generation(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_portal_collapses_to_failure() {
        // Port 9 (discard) on loopback is not expected to accept HTTP.
        let config = PortalConfig::new("http://127.0.0.1:9/")
            .unwrap()
            .with_connect_timeout(std::time::Duration::from_secs(2));
        let client = AncpiClient::new(config);

        let outcome = client.list_units("ALBA").await;
        assert!(!outcome.is_success());
        assert!(!outcome.error().unwrap().is_empty());
    }
}

use async_trait::async_trait;

use crate::portal::{AncpiClient, Outcome, RecordLookup, RecordQuery, UnitsListing};

/// Cadastral portal operations. Failures are reported in the [`Outcome`], never raised.
#[async_trait]
pub trait CadastralPortal: Send + Sync {
    /// Administrative units (UAT) of a county
    async fn list_units(&self, county: &str) -> Outcome<UnitsListing>;

    /// Carte funciară search
    async fn query_record(&self, query: &RecordQuery) -> Outcome<RecordLookup>;
}

#[async_trait]
impl CadastralPortal for AncpiClient {
    async fn list_units(&self, county: &str) -> Outcome<UnitsListing> {
        AncpiClient::list_units(self, county).await
    }

    async fn query_record(&self, query: &RecordQuery) -> Outcome<RecordLookup> {
        AncpiClient::query_record(self, query).await
    }
}

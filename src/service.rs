use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::Serialize;
use tower::Service;
use tracing::info;

use crate::config::PortalConfig;
use crate::portal::{AncpiClient, Outcome, RecordLookup, RecordQuery, UnitsListing};
use crate::traits::CadastralPortal;

/// Portal request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalRequest {
    ListUnits { county: String },
    QueryRecord(RecordQuery),
}

impl PortalRequest {
    pub fn list_units(county: impl Into<String>) -> Self {
        PortalRequest::ListUnits {
            county: county.into(),
        }
    }

    pub fn query_record(query: RecordQuery) -> Self {
        PortalRequest::QueryRecord(query)
    }
}

/// Portal response; serializes to the outcome JSON shape of the operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PortalResponse {
    Units(Outcome<UnitsListing>),
    Record(Outcome<RecordLookup>),
}

impl PortalResponse {
    pub fn is_success(&self) -> bool {
        match self {
            PortalResponse::Units(outcome) => outcome.is_success(),
            PortalResponse::Record(outcome) => outcome.is_success(),
        }
    }
}

/// tower::Service over a [`CadastralPortal`]. Clones share the portal (and its session).
#[derive(Debug)]
pub struct PortalService<P = AncpiClient> {
    portal: Arc<P>,
}

impl<P> Clone for PortalService<P> {
    fn clone(&self) -> Self {
        Self {
            portal: Arc::clone(&self.portal),
        }
    }
}

impl PortalService<AncpiClient> {
    pub fn new(config: PortalConfig) -> Self {
        Self::with_portal(AncpiClient::new(config))
    }
}

impl<P: CadastralPortal> PortalService<P> {
    pub fn with_portal(portal: P) -> Self {
        Self {
            portal: Arc::new(portal),
        }
    }

    pub fn portal(&self) -> &P {
        &self.portal
    }
}

impl<P: CadastralPortal + 'static> Service<PortalRequest> for PortalService<P> {
    type Response = PortalResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PortalRequest) -> Self::Future {
        let portal = Arc::clone(&self.portal);

        Box::pin(async move {
            let response = match req {
                PortalRequest::ListUnits { county } => {
                    info!("Portal request: list units: county={}", county);
                    PortalResponse::Units(portal.list_units(&county).await)
                }
                PortalRequest::QueryRecord(query) => {
                    info!(
                        "Portal request: query record: county={}, record={}",
                        query.county, query.record_number
                    );
                    PortalResponse::Record(portal.query_record(&query).await)
                }
            };

            info!("Portal request done: success={}", response.is_success());
            Ok(response)
        })
    }
}

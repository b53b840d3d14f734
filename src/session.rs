//! Cookie-bearing HTTP session and its owner
//!
//! A [`Session`] is one `reqwest::Client` with its own cookie jar and a
//! browser-like header set. It is never modified after construction; the
//! only state that changes is the jar, which collects whatever cookies the
//! portal sets. Invalidating a session drops it whole, and the next
//! operation builds a fresh one.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::config::PortalConfig;
use crate::error::ScraperError;

const X_REQUESTED_WITH: &str = "x-requested-with";

#[derive(Debug)]
pub struct Session {
    client: Client,
    user_agent: String,
    generation: u64,
}

impl Session {
    fn new(config: &PortalConfig, generation: u64) -> Result<Self, ScraperError> {
        if config.user_agents.is_empty() {
            return Err(ScraperError::Config("user agent pool is empty".into()));
        }
        let user_agent =
            config.user_agents[rand::rng().random_range(0..config.user_agents.len())].clone();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&user_agent)?);
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(REFERER, header_value(config.referer())?);
        headers.insert(ORIGIN, header_value(&config.origin())?);

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ScraperError::SessionInit(e.to_string()))?;

        Ok(Self {
            client,
            user_agent,
            generation,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 1 for the first session a manager creates, 2 for the next, and so on.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value)
        .map_err(|e| ScraperError::Config(format!("header value {:?}: {}", value, e)))
}

/// Owns at most one live [`Session`].
///
/// Callers take the lock for a whole token-fetch-then-act sequence, so two
/// operations never interleave on the same cookie jar.
#[derive(Debug)]
pub struct SessionManager {
    config: PortalConfig,
    current: Mutex<Option<Session>>,
    created: AtomicU64,
}

impl SessionManager {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            current: Mutex::new(None),
            created: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Exclusive access to the session slot until the guard is dropped.
    pub async fn lock(&self) -> SessionGuard<'_> {
        SessionGuard {
            manager: self,
            slot: self.current.lock().await,
        }
    }

    /// Drop the live session, if any. Waits for an in-flight operation to finish.
    pub async fn invalidate(&self) {
        self.lock().await.invalidate();
    }

    /// Number of sessions created so far.
    pub fn generation(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }
}

pub struct SessionGuard<'a> {
    manager: &'a SessionManager,
    slot: MutexGuard<'a, Option<Session>>,
}

impl SessionGuard<'_> {
    /// The live session, built on first use.
    pub fn get_or_create(&mut self) -> Result<&Session, ScraperError> {
        if self.slot.is_none() {
            let generation = self.manager.created.load(Ordering::SeqCst) + 1;
            let session = Session::new(&self.manager.config, generation)?;
            self.manager.created.store(generation, Ordering::SeqCst);
            info!(
                "Created portal session: generation={}, user_agent={}",
                generation, session.user_agent
            );
            *self.slot = Some(session);
        }

        (*self.slot)
            .as_ref()
            .ok_or_else(|| ScraperError::SessionInit("session slot empty after creation".into()))
    }

    pub fn invalidate(&mut self) {
        if let Some(session) = self.slot.take() {
            debug!("Discarded portal session: generation={}", session.generation);
        }
    }

    pub fn is_live(&self) -> bool {
        self.slot.is_some()
    }
}

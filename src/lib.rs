//! ANCPI carte funciară portal client
//!
//! - Reads the anti-automation token (`stoken`) from the portal homepage
//! - Lists the administrative units (UAT) of a county
//! - Searches cadastral records by county, city and record number
//!
//! Each operation runs inside a cookie-bearing session that is created
//! lazily and shared between operations. A record search drops the session
//! once it has been sent, so the next lookup starts clean.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ancpi_scraper::{AncpiClient, PortalConfig, RecordQuery};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AncpiClient::new(PortalConfig::default());
//!
//!     let units = client.list_units("ALBA").await;
//!     println!("{}", serde_json::to_string_pretty(&units).unwrap());
//!
//!     let query = RecordQuery::new("ALBA", "Alba Iulia", "42", "100002");
//!     let record = client.query_record(&query).await;
//!     println!("{}", serde_json::to_string_pretty(&record).unwrap());
//! }
//! ```
//!
//! # tower Service
//!
//! ```rust,ignore
//! use ancpi_scraper::{PortalConfig, PortalRequest, PortalService};
//! use tower::Service;
//!
//! let mut service = PortalService::new(PortalConfig::from_env()?);
//! let response = service.call(PortalRequest::list_units("CJ")).await?;
//! ```

pub mod config;
pub mod error;
pub mod portal;
pub mod service;
pub mod session;
pub mod token;
pub mod traits;

// Main types re-exported
pub use config::PortalConfig;
pub use error::ScraperError;
pub use portal::{AncpiClient, City, Outcome, RecordLookup, RecordQuery, UnitsListing};
pub use service::{PortalRequest, PortalResponse, PortalService};
pub use session::{Session, SessionManager};
pub use token::{extract_token, Token, STOKEN_FIELD_ID};
pub use traits::CadastralPortal;

//! ANCPI carte funciară portal
//!
//! Administrative unit listing and cadastral record search over a
//! token-guarded AJAX API.

mod client;
mod types;

pub use client::AncpiClient;
pub use types::{City, Outcome, RecordLookup, RecordQuery, UnitsListing, DEFAULT_PAGE_ID};

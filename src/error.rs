use thiserror::Error;

use crate::token::STOKEN_FIELD_ID;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token not found: #{} is missing or empty", STOKEN_FIELD_ID)]
    TokenNotFound,

    #[error("unexpected portal response: {0}")]
    UpstreamData(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("session initialization failed: {0}")]
    SessionInit(String),
}

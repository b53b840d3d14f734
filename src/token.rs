//! Anti-automation token (`stoken`) extraction
//!
//! The portal's homepage embeds a short-lived token in a hidden form field.
//! Every AJAX endpoint expects it as the last path segment.

use std::fmt;

use scraper::{Html, Selector};

use crate::error::ScraperError;

/// Element id of the hidden field carrying the token.
pub const STOKEN_FIELD_ID: &str = "orders-stoken";

/// Token read from the homepage. Only valid within the session that fetched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the `value` of `#orders-stoken` out of a homepage document.
pub fn extract_token(html: &str) -> Result<Token, ScraperError> {
    let selector = Selector::parse(&format!("#{}", STOKEN_FIELD_ID))
        .map_err(|e| ScraperError::UpstreamData(format!("invalid token selector: {}", e)))?;

    let document = Html::parse_document(html);
    let value = document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("value"))
        .unwrap_or_default();

    if value.is_empty() {
        return Err(ScraperError::TokenNotFound);
    }

    Ok(Token(value.to_string()))
}

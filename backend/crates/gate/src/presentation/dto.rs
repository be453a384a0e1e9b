//! Request payloads
//!
//! Every field is optional: an absent pin or token is a validation
//! failure that re-renders the entry page, never a 4xx rejection.

use serde::Deserialize;

/// Query for GET /level0
#[derive(Debug, Clone, Deserialize)]
pub struct PinQuery {
    #[serde(default)]
    pub pin: Option<String>,
}

/// Form for POST /level1
#[derive(Debug, Clone, Deserialize)]
pub struct PinForm {
    #[serde(default)]
    pub pin: Option<String>,
}

/// Form for POST /level2 and POST /level3
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPinForm {
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

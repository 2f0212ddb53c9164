use serde::{Deserialize, Serialize};

/// One browser cookie, serialized with the same field names the WebDriver
/// wire protocol uses so the snapshot round-trips without translation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    #[serde(rename = "sameSite", skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

/// Serialized authenticated browser state. Freshness is only provable by a
/// live probe; a snapshot is superseded (never merged) when re-priming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Origin the cookies were captured on; seeding navigates here first so
    /// the cookie jar can be restored against the right domain.
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
}

impl SessionSnapshot {
    /// A snapshot is only worth probing when it actually carries cookies.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.cookies.is_empty()
    }
}

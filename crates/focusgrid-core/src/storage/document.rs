//! On-disk shape of the session data file.
//!
//! ```json
//! {
//!   "days": { "2024-01-01": { "focus_sessions": 2, "minutes": 50 } },
//!   "settings": { "playlist_url": "https://..." }
//! }
//! ```
//!
//! `settings` and any unknown top-level keys are opaque and round-trip
//! unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotals {
    #[serde(default)]
    pub focus_sessions: u64,
    #[serde(default)]
    pub minutes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Keyed by `YYYY-MM-DD`. Kept as strings so malformed keys written by
    /// other tools survive a rewrite.
    #[serde(default)]
    pub days: BTreeMap<String, DayTotals>,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

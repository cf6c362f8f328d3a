//! Check outcome model reported to the monitoring service

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Failed,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "ok"),
            CheckStatus::Warning => write!(f, "warning"),
            CheckStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Status plus the two human readable messages that accompany it.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: CheckStatus,
    pub notification_message: String,
    pub short_summary: String,
}

impl Verdict {
    pub fn ok(notification_message: impl Into<String>, short_summary: impl Into<String>) -> Self {
        Self::new(CheckStatus::Ok, notification_message, short_summary)
    }

    pub fn warning(
        notification_message: impl Into<String>,
        short_summary: impl Into<String>,
    ) -> Self {
        Self::new(CheckStatus::Warning, notification_message, short_summary)
    }

    pub fn failed(
        notification_message: impl Into<String>,
        short_summary: impl Into<String>,
    ) -> Self {
        Self::new(CheckStatus::Failed, notification_message, short_summary)
    }

    pub fn new(
        status: CheckStatus,
        notification_message: impl Into<String>,
        short_summary: impl Into<String>,
    ) -> Self {
        Self {
            status,
            notification_message: notification_message.into(),
            short_summary: short_summary.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub label: String,
    pub status: CheckStatus,
    pub notification_message: String,
    pub short_summary: String,
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, label: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            status: verdict.status,
            notification_message: verdict.notification_message,
            short_summary: verdict.short_summary,
            meta: serde_json::Map::new(),
        }
    }

    /// Attaches diagnostics. Non-object values are stored under a single `value` key.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = match meta {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self
    }
}

//! Sentry error tracking connection settings

use crate::health::{
    sources::{is_empty_value, ConfigReader},
    Check, CheckResult, Verdict,
};
use serde_json::json;
use std::sync::Arc;

pub const NAME: &str = "sentry_connection";
const LABEL: &str = "Sentry connection";

pub struct SentryConnectionCheck {
    deployment_config: Arc<dyn ConfigReader>,
}

impl SentryConnectionCheck {
    pub fn new(deployment_config: Arc<dyn ConfigReader>) -> Self {
        Self { deployment_config }
    }
}

impl Check for SentryConnectionCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self) -> CheckResult {
        let dsn = self.deployment_config.get("sentry/dsn");
        let environment = self.deployment_config.get("sentry/environment");

        let verdict = if !is_empty_value(dsn.as_ref()) && !is_empty_value(environment.as_ref()) {
            Verdict::ok("Sentry is configured", "Sentry is configured")
        } else {
            Verdict::failed("Sentry is not configured", "Sentry not configured")
        };

        CheckResult::new(NAME, LABEL, verdict).with_meta(json!({
            "dsn": dsn,
            "environment": environment,
            "log_level": self.deployment_config.get("sentry/log_level"),
            "mage_mode_development": self.deployment_config.get("sentry/mage_mode_development"),
        }))
    }
}

//! Bytecode cache (OPcache) hit rate

use crate::health::{
    sources::{ConfigReader, OpcacheStatus, OpcacheStatusSource},
    threshold::{resolve_rate_threshold, ThresholdPolicy},
    Check, CheckResult, CheckStatus, Verdict,
};
use serde_json::json;
use std::sync::Arc;

pub const NAME: &str = "opcache_hit_rate";
const LABEL: &str = "OPcache Hit Rate";

const CONFIG_PREFIX: &str = "ohdear/Elgentos\\OhDearChecks\\Checks\\OpcacheHitRate";

// Minimum acceptable hit rate percentages.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 95.0;
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 90.0;

pub struct OpcacheHitRateCheck {
    opcache: Arc<dyn OpcacheStatusSource>,
    deployment_config: Arc<dyn ConfigReader>,
}

impl OpcacheHitRateCheck {
    pub fn new(
        opcache: Arc<dyn OpcacheStatusSource>,
        deployment_config: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            opcache,
            deployment_config,
        }
    }

    pub fn policy(&self) -> ThresholdPolicy<f64> {
        let setting = |key: &str| {
            self.deployment_config.get(&format!("{}/{}", CONFIG_PREFIX, key))
        };
        let warning = setting("warning_threshold");
        let critical = setting("critical_threshold");

        ThresholdPolicy::lower_is_worse(
            resolve_rate_threshold(warning.as_ref(), DEFAULT_WARNING_THRESHOLD),
            resolve_rate_threshold(critical.as_ref(), DEFAULT_CRITICAL_THRESHOLD),
        )
    }
}

impl Check for OpcacheHitRateCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self) -> CheckResult {
        let stats = match self.opcache.status() {
            OpcacheStatus::Unavailable => {
                return CheckResult::new(
                    NAME,
                    LABEL,
                    Verdict::failed("OPcache extension is not available", "OPcache not available"),
                )
                .with_meta(json!({ "opcache_available": false }));
            }
            OpcacheStatus::Disabled => {
                return CheckResult::new(
                    NAME,
                    LABEL,
                    Verdict::failed("OPcache is not enabled", "OPcache disabled"),
                )
                .with_meta(json!({
                    "opcache_available": true,
                    "opcache_enabled": false,
                }));
            }
            OpcacheStatus::Enabled(stats) => stats,
        };

        let policy = self.policy();
        let hit_rate = stats.hit_rate;
        let summary = format!("Hit rate: {:.2}%", hit_rate);

        let verdict = match policy.classify(hit_rate) {
            CheckStatus::Failed => Verdict::failed(
                format!(
                    "Critical: OPcache hit rate is {:.2}% (below {:.2}%)",
                    hit_rate, policy.critical
                ),
                summary,
            ),
            CheckStatus::Warning => Verdict::warning(
                format!(
                    "Warning: OPcache hit rate is {:.2}% (below {:.2}%)",
                    hit_rate, policy.warning
                ),
                summary,
            ),
            CheckStatus::Ok => Verdict::ok(
                format!("OPcache hit rate is healthy at {:.2}%", hit_rate),
                summary,
            ),
        };

        CheckResult::new(NAME, LABEL, verdict).with_meta(json!({
            "opcache_available": true,
            "opcache_enabled": true,
            "hits": stats.hits,
            "misses": stats.misses,
            "blacklist_misses": stats.blacklist_misses,
            "num_cached_scripts": stats.num_cached_scripts,
            "hit_rate": hit_rate,
            "warning_threshold": policy.warning,
            "critical_threshold": policy.critical,
        }))
    }
}

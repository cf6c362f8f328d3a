//! Indexer changelog backlog

use crate::health::{
    sources::{ConfigReader, IndexerRegistry, ProductCatalog, SourceError},
    threshold::{resolve_count_threshold, ThresholdPolicy},
    Check, CheckResult, CheckStatus, Verdict,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub const NAME: &str = "indexer_backlog";
const LABEL: &str = "Indexer Backlog";

const CONFIG_PREFIX: &str = "ohdear/Elgentos\\OhDearChecks\\Checks\\IndexerBacklog";

pub const DEFAULT_WARNING_THRESHOLD: u64 = 1000;
pub const DEFAULT_CRITICAL_THRESHOLD: u64 = 10000;

pub const DEFAULT_INDEXER_IDS: [&str; 12] = [
    "catalog_product_price",
    "catalog_category_product",
    "catalogsearch_fulltext",
    "catalog_product_attribute",
    "cataloginventory_stock",
    "inventory",
    "catalogrule_rule",
    "catalogrule_product",
    "customer_grid",
    "design_config_grid",
    "targetrule_product_rule",
    "targetrule_rule_product",
];

/// Indexers whose backlog is also reported relative to the catalogue size.
pub const DEFAULT_PRODUCT_INDEXER_IDS: [&str; 6] = [
    "catalog_product_price",
    "catalog_category_product",
    "catalogsearch_fulltext",
    "catalog_product_attribute",
    "cataloginventory_stock",
    "inventory",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexerBacklog {
    pub title: String,
    pub backlog: u64,
    pub percentage: Option<f64>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacklogSummary {
    pub max_backlog: u64,
    pub total_backlog: u64,
    pub indexers_with_backlog: usize,
}

impl BacklogSummary {
    pub fn from_backlogs<'a>(backlogs: impl IntoIterator<Item = &'a IndexerBacklog>) -> Self {
        backlogs
            .into_iter()
            .filter(|entry| entry.backlog > 0)
            .fold(Self::default(), |mut summary, entry| {
                summary.indexers_with_backlog += 1;
                summary.total_backlog = summary.total_backlog.saturating_add(entry.backlog);
                summary.max_backlog = summary.max_backlog.max(entry.backlog);
                summary
            })
    }
}

pub struct IndexerBacklogCheck {
    indexer_registry: Arc<dyn IndexerRegistry>,
    product_catalog: Arc<dyn ProductCatalog>,
    deployment_config: Arc<dyn ConfigReader>,
}

impl IndexerBacklogCheck {
    pub fn new(
        indexer_registry: Arc<dyn IndexerRegistry>,
        product_catalog: Arc<dyn ProductCatalog>,
        deployment_config: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            indexer_registry,
            product_catalog,
            deployment_config,
        }
    }

    fn setting(&self, key: &str) -> Option<Value> {
        self.deployment_config.get(&format!("{}/{}", CONFIG_PREFIX, key))
    }

    fn id_list(&self, key: &str, defaults: &[&str]) -> Vec<String> {
        let configured: Vec<String> = match self.setting(key) {
            Some(Value::Array(ids)) => ids
                .iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        if configured.is_empty() {
            defaults.iter().map(|id| id.to_string()).collect()
        } else {
            configured
        }
    }

    pub fn indexer_ids(&self) -> Vec<String> {
        self.id_list("indexer_ids", &DEFAULT_INDEXER_IDS)
    }

    pub fn product_indexer_ids(&self) -> Vec<String> {
        self.id_list("product_indexer_ids", &DEFAULT_PRODUCT_INDEXER_IDS)
    }

    pub fn policy(&self) -> ThresholdPolicy<u64> {
        let warning = self.setting("warning_threshold");
        let critical = self.setting("critical_threshold");

        ThresholdPolicy::higher_is_worse(
            resolve_count_threshold(warning.as_ref(), DEFAULT_WARNING_THRESHOLD),
            resolve_count_threshold(critical.as_ref(), DEFAULT_CRITICAL_THRESHOLD),
        )
    }

    fn total_products(&self) -> u64 {
        match self.product_catalog.product_count() {
            Ok(count) => count,
            Err(e) => {
                debug!("Product count unavailable, treating as zero: {}", e);
                0
            }
        }
    }

    /// Backlog per scheduled indexer; unknown, failing and realtime indexers are skipped.
    pub fn collect_backlogs(&self, total_products: u64) -> BTreeMap<String, IndexerBacklog> {
        let product_indexers = self.product_indexer_ids();
        let mut backlogs = BTreeMap::new();

        for id in self.indexer_ids() {
            let indexer = match self.indexer_registry.get(&id) {
                Ok(indexer) => indexer,
                Err(SourceError::NotFound(_)) => continue,
                Err(e) => {
                    debug!("Skipping indexer '{}': {}", id, e);
                    continue;
                }
            };

            if !indexer.scheduled {
                continue;
            }

            let backlog = indexer.backlog();
            let percentage = if total_products > 0 && product_indexers.contains(&id) {
                Some(round_to_hundredths(backlog as f64 / total_products as f64 * 100.0))
            } else {
                None
            };

            backlogs.insert(
                id,
                IndexerBacklog {
                    title: indexer.title,
                    backlog,
                    percentage,
                    status: indexer.status,
                },
            );
        }

        backlogs
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Check for IndexerBacklogCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self) -> CheckResult {
        let policy = self.policy();
        let total_products = self.total_products();
        let backlogs = self.collect_backlogs(total_products);
        let summary = BacklogSummary::from_backlogs(backlogs.values());

        let max = summary.max_backlog;
        let verdict = match policy.classify(max) {
            CheckStatus::Failed => Verdict::failed(
                format!("Critical indexer backlog detected: {} items in backlog", max),
                format!("Critical backlog: {} items", max),
            ),
            CheckStatus::Warning => Verdict::warning(
                format!("High indexer backlog detected: {} items in backlog", max),
                format!("High backlog: {} items", max),
            ),
            CheckStatus::Ok if summary.indexers_with_backlog > 0 => Verdict::ok(
                format!(
                    "{} indexer(s) have backlog but within acceptable range",
                    summary.indexers_with_backlog
                ),
                format!("{} indexer(s) with minor backlog", summary.indexers_with_backlog),
            ),
            CheckStatus::Ok => {
                Verdict::ok("All indexers are up to date", "All indexers up to date")
            }
        };

        CheckResult::new(NAME, LABEL, verdict).with_meta(json!({
            "indexers": backlogs,
            "total_products": total_products,
            "max_backlog": summary.max_backlog,
            "total_backlog": summary.total_backlog,
            "indexers_with_backlog": summary.indexers_with_backlog,
            "warning_threshold": policy.warning,
            "critical_threshold": policy.critical,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::testing::{FakeCatalog, FakeIndexers, MapConfig};

    fn setting_path(key: &str) -> String {
        format!("{}/{}", CONFIG_PREFIX, key)
    }

    fn check(
        indexers: FakeIndexers,
        products: FakeCatalog,
        config: MapConfig,
    ) -> IndexerBacklogCheck {
        IndexerBacklogCheck::new(Arc::new(indexers), Arc::new(products), Arc::new(config))
    }

    #[test]
    fn test_single_product_indexer_warning() {
        let indexers = FakeIndexers::default().scheduled("catalog_product_price", 5000, 0);
        let result = check(indexers, FakeCatalog::count(10000), MapConfig::default()).run();

        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.short_summary, "High backlog: 5000 items");
        assert_eq!(result.meta["max_backlog"], json!(5000));
        assert_eq!(result.meta["total_products"], json!(10000));

        let entry = &result.meta["indexers"]["catalog_product_price"];
        assert_eq!(entry["backlog"], json!(5000));
        assert_eq!(entry["percentage"], json!(50.0));
    }

    #[test]
    fn test_critical_backlog_fails_regardless_of_others() {
        let indexers = FakeIndexers::default()
            .scheduled("catalog_product_price", 15000, 0)
            .scheduled("customer_grid", 10, 0)
            .scheduled("inventory", 0, 0);
        let result = check(indexers, FakeCatalog::count(500), MapConfig::default()).run();

        assert_eq!(result.status, CheckStatus::Failed);
        assert_eq!(
            result.notification_message,
            "Critical indexer backlog detected: 15000 items in backlog"
        );
        assert_eq!(result.meta["total_backlog"], json!(15010));
        assert_eq!(result.meta["indexers_with_backlog"], json!(2));
    }

    #[test]
    fn test_minor_backlog_is_ok_with_distinct_message() {
        let indexers = FakeIndexers::default()
            .scheduled("customer_grid", 120, 100)
            .scheduled("inventory", 50, 45);
        let result = check(indexers, FakeCatalog::count(100), MapConfig::default()).run();

        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.short_summary, "2 indexer(s) with minor backlog");
        assert_eq!(result.meta["indexers"]["customer_grid"]["percentage"], json!(null));
        assert_eq!(result.meta["indexers"]["inventory"]["percentage"], json!(5.0));
    }

    #[test]
    fn test_no_backlog_reports_up_to_date() {
        let result =
            check(FakeIndexers::default(), FakeCatalog::count(0), MapConfig::default()).run();

        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.notification_message, "All indexers are up to date");
        assert_eq!(result.meta["indexers"], json!({}));
        assert_eq!(result.meta["warning_threshold"], json!(DEFAULT_WARNING_THRESHOLD));
        assert_eq!(result.meta["critical_threshold"], json!(DEFAULT_CRITICAL_THRESHOLD));
    }

    #[test]
    fn test_unscheduled_missing_and_failing_indexers_are_skipped() {
        let indexers = FakeIndexers::default()
            .realtime("catalog_product_price", 50000, 0)
            .failing("catalogsearch_fulltext");
        let result = check(indexers, FakeCatalog::count(10), MapConfig::default()).run();

        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.meta["indexers"], json!({}));
    }

    #[test]
    fn test_negative_backlog_is_clamped() {
        let indexers = FakeIndexers::default().scheduled("catalog_product_price", 10, 40);
        let result = check(indexers, FakeCatalog::count(100), MapConfig::default()).run();

        let entry = &result.meta["indexers"]["catalog_product_price"];
        assert_eq!(entry["backlog"], json!(0));
        assert_eq!(entry["percentage"], json!(0.0));
        assert_eq!(result.meta["indexers_with_backlog"], json!(0));
    }

    #[test]
    fn test_product_count_failure_counts_as_zero() {
        let indexers = FakeIndexers::default().scheduled("catalog_product_price", 30, 0);
        let result = check(indexers, FakeCatalog::failing(), MapConfig::default()).run();

        assert_eq!(result.meta["total_products"], json!(0));
        assert_eq!(result.meta["indexers"]["catalog_product_price"]["percentage"], json!(null));
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        let indexers = FakeIndexers::default().scheduled("inventory", 1, 0);
        let result = check(indexers, FakeCatalog::count(3), MapConfig::default()).run();

        assert_eq!(result.meta["indexers"]["inventory"]["percentage"], json!(33.33));
    }

    #[test]
    fn test_configured_thresholds_and_indexer_list() {
        let config = MapConfig::default()
            .with(&setting_path("indexer_ids"), json!(["custom_indexer"]))
            .with(&setting_path("product_indexer_ids"), json!(["custom_indexer"]))
            .with(&setting_path("warning_threshold"), json!("10"))
            .with(&setting_path("critical_threshold"), json!(20));
        let indexers = FakeIndexers::default()
            .scheduled("custom_indexer", 25, 0)
            .scheduled("catalog_product_price", 90000, 0);
        let result = check(indexers, FakeCatalog::count(100), config).run();

        assert_eq!(result.status, CheckStatus::Failed);
        assert_eq!(result.meta["max_backlog"], json!(25));
        assert_eq!(result.meta["warning_threshold"], json!(10));
        assert_eq!(result.meta["critical_threshold"], json!(20));
        assert_eq!(result.meta["indexers"]["custom_indexer"]["percentage"], json!(25.0));
    }

    #[test]
    fn test_invalid_overrides_fall_back_to_defaults() {
        let config = MapConfig::default()
            .with(&setting_path("indexer_ids"), json!([]))
            .with(&setting_path("warning_threshold"), json!("lots"))
            .with(&setting_path("critical_threshold"), json!(-5));
        let check = check(FakeIndexers::default(), FakeCatalog::count(0), config);

        assert_eq!(check.indexer_ids().len(), DEFAULT_INDEXER_IDS.len());
        let policy = check.policy();
        assert_eq!(policy.warning, DEFAULT_WARNING_THRESHOLD);
        assert_eq!(policy.critical, DEFAULT_CRITICAL_THRESHOLD);
    }

    #[test]
    fn test_summary_ignores_zero_backlogs() {
        let entry = |title: &str, backlog: u64, status: &str| IndexerBacklog {
            title: title.into(),
            backlog,
            percentage: None,
            status: status.into(),
        };
        let entries = [entry("A", 0, "valid"), entry("B", 7, "valid"), entry("C", 3, "invalid")];
        let summary = BacklogSummary::from_backlogs(entries.iter());

        assert_eq!(summary.max_backlog, 7);
        assert_eq!(summary.total_backlog, 10);
        assert_eq!(summary.indexers_with_backlog, 2);
    }
}

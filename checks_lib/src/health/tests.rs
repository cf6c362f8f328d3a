#[cfg(test)]
mod tests {
    use crate::health::checks::{indexer_backlog, ALL_CHECK_NAMES};
    use crate::health::{Check, CheckReport, CheckResult, CheckRunner, CheckStatus, Verdict};
    use crate::snapshot::{PlatformSnapshot, SnapshotFormat};
    use serde_json::json;
    use std::sync::Arc;

    struct StaticCheck {
        name: &'static str,
        status: CheckStatus,
    }

    impl Check for StaticCheck {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self) -> CheckResult {
            CheckResult::new(
                self.name,
                "Static",
                Verdict::new(self.status, format!("{} is {}", self.name, self.status), "static"),
            )
        }
    }

    fn healthy_snapshot() -> Arc<PlatformSnapshot> {
        let snapshot = PlatformSnapshot::parse(
            &json!({
                "deployment": {
                    "http_cache_hosts": [{"host": "varnish", "port": "6081"}],
                    "sentry": {"dsn": "https://key@sentry.example/1", "environment": "production"}
                },
                "store_config": {
                    "sansec_shield": {"general": {"enabled": "1", "license_key": "XYZ"}}
                },
                "modules": ["Sansec_Shield", "Magento_Catalog"],
                "indexers": {
                    "catalog_product_price": {
                        "title": "Product Price",
                        "scheduled": true,
                        "changelog_version": 12,
                        "last_processed_version": 10
                    }
                },
                "product_count": 200,
                "opcache": {
                    "available": true,
                    "enabled": true,
                    "statistics": {"hits": 990, "misses": 10, "opcache_hit_rate": 99.0}
                }
            })
            .to_string(),
            SnapshotFormat::Json,
        )
        .unwrap();

        Arc::new(snapshot)
    }

    #[test]
    fn test_check_status_ordering_and_display() {
        assert!(CheckStatus::Ok < CheckStatus::Warning);
        assert!(CheckStatus::Warning < CheckStatus::Failed);
        assert_eq!(CheckStatus::Failed.to_string(), "failed");
        assert_eq!(serde_json::to_value(CheckStatus::Warning).unwrap(), json!("warning"));
    }

    #[test]
    fn test_check_result_serialization_uses_report_field_names() {
        let result = CheckResult::new("disk", "Disk", Verdict::ok("Plenty of space", "90% free"))
            .with_meta(json!({"free_percent": 90}));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["notificationMessage"], json!("Plenty of space"));
        assert_eq!(value["shortSummary"], json!("90% free"));
        assert_eq!(value["status"], json!("ok"));
        assert_eq!(value["meta"]["free_percent"], json!(90));
    }

    #[test]
    fn test_with_meta_wraps_scalars() {
        let result = CheckResult::new("a", "A", Verdict::ok("m", "s")).with_meta(json!(3));
        assert_eq!(result.meta["value"], json!(3));

        let result = CheckResult::new("a", "A", Verdict::ok("m", "s")).with_meta(json!(null));
        assert!(result.meta.is_empty());
    }

    #[test]
    fn test_empty_runner_reports_ok() {
        let runner = CheckRunner::new();
        let report = runner.run_all();

        assert!(runner.is_empty());
        assert!(report.check_results.is_empty());
        assert_eq!(report.overall_status(), CheckStatus::Ok);
    }

    #[test]
    fn test_overall_status_is_worst_result() {
        let runner = CheckRunner::new()
            .add_check(StaticCheck { name: "first", status: CheckStatus::Ok })
            .add_check(StaticCheck { name: "second", status: CheckStatus::Warning });
        assert_eq!(runner.run_all().overall_status(), CheckStatus::Warning);

        let runner = runner.add_check(StaticCheck { name: "third", status: CheckStatus::Failed });
        let report = runner.run_all();

        assert_eq!(report.overall_status(), CheckStatus::Failed);
        assert_eq!(runner.check_names(), vec!["first", "second", "third"]);
        assert_eq!(report.result("second").unwrap().status, CheckStatus::Warning);
    }

    #[test]
    fn test_run_check_by_name() {
        let runner = CheckRunner::new().add_check(StaticCheck {
            name: "only",
            status: CheckStatus::Ok,
        });

        assert_eq!(runner.run_check("only").unwrap().name, "only");
        assert!(runner.run_check("missing").is_none());
    }

    #[test]
    fn test_report_serialization() {
        let report = CheckReport {
            finished_at: 1_700_000_000,
            check_results: vec![CheckResult::new("a", "A", Verdict::failed("down", "down"))],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["finishedAt"], json!(1_700_000_000));
        assert_eq!(value["checkResults"][0]["status"], json!("failed"));

        let round_trip: CheckReport = serde_json::from_value(value).unwrap();
        assert_eq!(round_trip, report);
    }

    #[test]
    fn test_from_snapshot_registers_every_check() {
        let runner = CheckRunner::from_snapshot(healthy_snapshot(), &[]);
        assert_eq!(runner.check_names(), ALL_CHECK_NAMES.to_vec());

        let report = runner.run_all();
        assert_eq!(report.overall_status(), CheckStatus::Ok);

        let backlog = report.result(indexer_backlog::NAME).unwrap();
        assert_eq!(backlog.short_summary, "1 indexer(s) with minor backlog");
        assert_eq!(backlog.meta["indexers"]["catalog_product_price"]["percentage"], json!(1.0));
    }

    #[test]
    fn test_from_snapshot_skips_disabled_checks() {
        let disabled = vec!["opcache_hit_rate".to_string(), "sansec_shield".to_string()];
        let runner = CheckRunner::from_snapshot(healthy_snapshot(), &disabled);

        assert_eq!(
            runner.check_names(),
            vec!["http_cache_hosts", "indexer_backlog", "sentry_connection"]
        );
    }

    #[test]
    fn test_every_result_is_fully_populated() {
        for snapshot in [healthy_snapshot(), Arc::new(PlatformSnapshot::default())] {
            let report = CheckRunner::from_snapshot(snapshot, &[]).run_all();
            assert_eq!(report.check_results.len(), ALL_CHECK_NAMES.len());

            for result in &report.check_results {
                assert!(!result.name.is_empty());
                assert!(!result.label.is_empty());
                assert!(!result.notification_message.is_empty());
                assert!(!result.short_summary.is_empty());
            }
        }
    }

    #[test]
    fn test_empty_platform_fails_configuration_checks() {
        let report =
            CheckRunner::from_snapshot(Arc::new(PlatformSnapshot::default()), &[]).run_all();

        assert_eq!(report.result("http_cache_hosts").unwrap().status, CheckStatus::Failed);
        assert_eq!(report.result("opcache_hit_rate").unwrap().status, CheckStatus::Failed);
        assert_eq!(report.result("sansec_shield").unwrap().status, CheckStatus::Failed);
        assert_eq!(report.result("sentry_connection").unwrap().status, CheckStatus::Failed);
        assert_eq!(report.result("indexer_backlog").unwrap().status, CheckStatus::Ok);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let runner = CheckRunner::from_snapshot(healthy_snapshot(), &[]);

        let first = runner.run_all();
        let second = runner.run_all();
        assert_eq!(first.check_results, second.check_results);
    }
}

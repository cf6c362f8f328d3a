//! Runs registered checks and aggregates their results into a report

use super::checks::{
    HttpCacheHostsCheck, IndexerBacklogCheck, OpcacheHitRateCheck, SansecShieldCheck,
    SentryConnectionCheck,
};
use super::{Check, CheckResult, CheckStatus};
use crate::snapshot::PlatformSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// One reporting cycle, in the shape the monitoring service consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub finished_at: i64,
    pub check_results: Vec<CheckResult>,
}

impl CheckReport {
    /// Worst status across all results; an empty report is `Ok`.
    pub fn overall_status(&self) -> CheckStatus {
        self.check_results
            .iter()
            .map(|result| result.status)
            .max()
            .unwrap_or(CheckStatus::Ok)
    }

    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.check_results.iter().find(|result| result.name == name)
    }
}

#[derive(Default)]
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<T: Check + 'static>(mut self, check: T) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn run_all(&self) -> CheckReport {
        info!("Running {} health checks", self.checks.len());

        let check_results: Vec<CheckResult> = self
            .checks
            .iter()
            .map(|check| run_logged(check.as_ref()))
            .collect();

        let report = CheckReport {
            finished_at: chrono::Utc::now().timestamp(),
            check_results,
        };

        info!("Health checks completed - Overall status: {}", report.overall_status());
        report
    }

    pub fn run_check(&self, name: &str) -> Option<CheckResult> {
        self.checks
            .iter()
            .find(|check| check.name() == name)
            .map(|check| run_logged(check.as_ref()))
    }
}

fn run_logged(check: &dyn Check) -> CheckResult {
    let start = Instant::now();
    let result = check.run();
    let elapsed = start.elapsed();

    match result.status {
        CheckStatus::Ok => {
            info!("Check '{}' passed in {:?}", check.name(), elapsed);
        }
        CheckStatus::Warning => {
            warn!(
                "Check '{}' warned in {:?}: {}",
                check.name(),
                elapsed,
                result.notification_message
            );
        }
        CheckStatus::Failed => {
            error!(
                "Check '{}' failed in {:?}: {}",
                check.name(),
                elapsed,
                result.notification_message
            );
        }
    }

    result
}

impl CheckRunner {
    /// Registers every shipped check against the given platform state, minus `disabled`.
    pub fn from_snapshot(snapshot: Arc<PlatformSnapshot>, disabled: &[String]) -> Self {
        let enabled = |name: &str| !disabled.iter().any(|d| d == name);
        let deployment = Arc::new(snapshot.deployment_config());
        let mut runner = CheckRunner::new();

        if enabled(super::checks::http_cache_hosts::NAME) {
            runner = runner.add_check(HttpCacheHostsCheck::new(deployment.clone()));
        }

        if enabled(super::checks::indexer_backlog::NAME) {
            runner = runner.add_check(IndexerBacklogCheck::new(
                snapshot.clone(),
                snapshot.clone(),
                deployment.clone(),
            ));
        }

        if enabled(super::checks::opcache_hit_rate::NAME) {
            runner =
                runner.add_check(OpcacheHitRateCheck::new(snapshot.clone(), deployment.clone()));
        }

        if enabled(super::checks::sansec_shield::NAME) {
            runner = runner.add_check(SansecShieldCheck::new(
                Arc::new(snapshot.store_config()),
                snapshot.clone(),
            ));
        }

        if enabled(super::checks::sentry_connection::NAME) {
            runner = runner.add_check(SentryConnectionCheck::new(deployment));
        }

        runner
    }
}

//! Reverse-proxy cache host configuration

use crate::health::{
    sources::{is_empty_value, ConfigReader},
    Check, CheckResult, Verdict,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "http_cache_hosts";
const LABEL: &str = "HTTP Cache Hosts Configuration";
const CONFIG_PATH: &str = "http_cache_hosts";

pub struct HttpCacheHostsCheck {
    deployment_config: Arc<dyn ConfigReader>,
}

impl HttpCacheHostsCheck {
    pub fn new(deployment_config: Arc<dyn ConfigReader>) -> Self {
        Self { deployment_config }
    }

    fn hosts(&self) -> Option<Vec<Value>> {
        match self.deployment_config.get(CONFIG_PATH) {
            Some(Value::Array(hosts)) => Some(hosts),
            _ => None,
        }
    }
}

/// At least one entry must carry both a host and a port.
fn is_configured(hosts: &[Value]) -> bool {
    hosts.iter().any(|entry| {
        entry.is_object()
            && !is_empty_value(entry.get("host"))
            && !is_empty_value(entry.get("port"))
    })
}

impl Check for HttpCacheHostsCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self) -> CheckResult {
        let hosts = self.hosts().unwrap_or_default();
        let configured = is_configured(&hosts);
        let hosts_count = hosts.len();

        let verdict = if configured {
            Verdict::ok(
                format!("HTTP cache hosts are properly configured with {} host(s)", hosts_count),
                format!("{} cache host(s) configured", hosts_count),
            )
        } else {
            Verdict::failed(
                "HTTP cache hosts are not configured. Varnish cache clearing will not work.",
                "HTTP cache hosts not configured",
            )
        };

        CheckResult::new(NAME, LABEL, verdict).with_meta(json!({
            "configured": configured,
            "hosts_count": hosts_count,
            "hosts": hosts,
        }))
    }
}

//! Sansec Shield security module installation and configuration

use crate::health::{
    sources::{is_empty_value, is_enabled_flag, ConfigReader, ModuleRegistry},
    Check, CheckResult, Verdict,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "sansec_shield";
const LABEL: &str = "Sansec Shield Security";

pub const MODULE_NAME: &str = "Sansec_Shield";
const CONFIG_PATH_ENABLED: &str = "sansec_shield/general/enabled";
const CONFIG_PATH_LICENSE_KEY: &str = "sansec_shield/general/license_key";

pub struct SansecShieldCheck {
    store_config: Arc<dyn ConfigReader>,
    modules: Arc<dyn ModuleRegistry>,
}

impl SansecShieldCheck {
    pub fn new(store_config: Arc<dyn ConfigReader>, modules: Arc<dyn ModuleRegistry>) -> Self {
        Self { store_config, modules }
    }
}

fn is_license_configured(license_key: Option<&Value>) -> bool {
    if is_empty_value(license_key) {
        return false;
    }

    match license_key {
        Some(Value::String(key)) => !key.trim().is_empty(),
        _ => true,
    }
}

impl Check for SansecShieldCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self) -> CheckResult {
        let enabled_value = self.store_config.get(CONFIG_PATH_ENABLED);
        let license_key = self.store_config.get(CONFIG_PATH_LICENSE_KEY);

        let module_installed = self.modules.has(MODULE_NAME);
        let module_enabled = is_enabled_flag(enabled_value.as_ref());
        let license_configured = is_license_configured(license_key.as_ref());

        let verdict = if !module_installed {
            Verdict::failed("Sansec Shield module is not installed", "Sansec Shield not installed")
        } else if !module_enabled {
            Verdict::failed(
                "Sansec Shield module is installed but not enabled in configuration",
                "Sansec Shield disabled",
            )
        } else if !license_configured {
            Verdict::warning(
                "Sansec Shield is enabled but license key is not configured",
                "Sansec Shield license missing",
            )
        } else {
            Verdict::ok(
                "Sansec Shield is properly installed, enabled, and configured",
                "Sansec Shield properly configured",
            )
        };

        CheckResult::new(NAME, LABEL, verdict).with_meta(json!({
            "module_installed": module_installed,
            "module_enabled": module_enabled,
            "license_configured": license_configured,
            "enabled_config_value": enabled_value,
            "license_key_present": !is_empty_value(license_key.as_ref()),
        }))
    }
}

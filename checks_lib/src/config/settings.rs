use crate::health::checks::ALL_CHECK_NAMES;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub snapshot: SnapshotConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// JSON or YAML file describing the platform state the checks read.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Expected value of the `oh-dear-health-check-secret` request header.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub disabled_checks: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./platform.json"),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        let config = builder.add_source(Self::environment()).build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// `APP_SERVER__PORT=8080`, `APP_REPORT__DISABLED_CHECKS=sansec_shield,sentry_connection`
    fn environment() -> Environment {
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("report.disabled_checks")
            .try_parsing(true)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.snapshot.path.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "Snapshot path cannot be empty".to_string(),
            ));
        }

        if matches!(&self.report.secret, Some(secret) if secret.is_empty()) {
            return Err(ConfigError::Message(
                "Report secret cannot be empty; omit it to disable verification".to_string(),
            ));
        }

        if let Some(unknown) = self
            .report
            .disabled_checks
            .iter()
            .find(|name| !ALL_CHECK_NAMES.contains(&name.as_str()))
        {
            return Err(ConfigError::Message(format!(
                "Unknown check in disabled_checks: {}",
                unknown
            )));
        }

        if self.report.secret.is_none() {
            tracing::warn!("No report secret configured - health results are publicly readable");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

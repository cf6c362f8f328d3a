pub mod settings;

pub use settings::{AppConfig, ReportConfig, ServerConfig, SnapshotConfig};

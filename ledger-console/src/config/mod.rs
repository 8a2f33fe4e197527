use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub ledger_service: ServiceSettings,
    pub payout_service: ServiceSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

/// Address of one backend. Each backend is configured on its own; nothing
/// assumes the two services share a host.
#[derive(Deserialize, Clone, Debug)]
pub struct ServiceSettings {
    /// Base URL, e.g. http://localhost:8080.
    pub url: String,
    /// Path prefix for the versioned API. `/auth/login` is not prefixed.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl ServiceSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_prefix: default_api_prefix(),
        }
    }
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SessionSettings {
    /// File the session is persisted to between invocations. When unset the
    /// session lives only as long as the process.
    pub storage_path: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector, e.g. http://tempo:4317. Traces are only exported when set.
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("cannot read current dir: {}", e)))?;

    // Allow running from the workspace root or from inside the crate.
    let configuration_directory = if base_path.ends_with("ledger-console") {
        base_path.join("config")
    } else {
        base_path.join("ledger-console").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

use serde::Deserialize;
use service_core::config::TelemetrySettings;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub erp_api: ErpApiSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "order-entry/static".to_string()
}

/// External ERP API receiving orders and customers.
#[derive(Deserialize, Clone, Debug)]
pub struct ErpApiSettings {
    /// Base URL (e.g., http://localhost/orden-venta-api).
    pub base_url: String,
    #[serde(default = "default_order_path")]
    pub order_path: String,
    #[serde(default = "default_customer_path")]
    pub customer_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_order_path() -> String {
    "/guardar_orden.php".to_string()
}

fn default_customer_path() -> String {
    "/guardar_cliente.php".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ErpApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            order_path: default_order_path(),
            customer_path: default_customer_path(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn order_url(&self) -> String {
        join_url(&self.base_url, &self.order_path)
    }

    pub fn customer_url(&self) -> String {
        join_url(&self.base_url, &self.customer_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    // Works from the workspace root and from inside the crate directory
    let configuration_directory = if base_path.ends_with("order-entry") {
        base_path.join("config")
    } else {
        base_path.join("order-entry").join("config")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_join_without_double_slashes() {
        let settings = ErpApiSettings::new("http://localhost/orden-venta-api/");

        assert_eq!(
            settings.order_url(),
            "http://localhost/orden-venta-api/guardar_orden.php"
        );
        assert_eq!(
            settings.customer_url(),
            "http://localhost/orden-venta-api/guardar_cliente.php"
        );
    }

    #[test]
    fn erp_settings_defaults_apply() {
        let settings: ErpApiSettings =
            serde_json::from_str(r#"{"base_url":"http://erp.local"}"#).unwrap();

        assert_eq!(settings.order_path, "/guardar_orden.php");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }
}

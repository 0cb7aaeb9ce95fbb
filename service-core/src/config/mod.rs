use serde::Deserialize;

/// Logging and trace export settings shared by every binary.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint (e.g., http://tempo:4317). Export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: TelemetrySettings =
            serde_json::from_str(r#"{"service_name":"order-entry"}"#).unwrap();

        assert_eq!(settings.service_name, "order-entry");
        assert_eq!(settings.log_level, "info");
        assert!(settings.otlp_endpoint.is_none());
    }
}

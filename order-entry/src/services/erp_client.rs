//! HTTP client for the ERP API receiving orders and customers.

use crate::config::ErpApiSettings;
use crate::models::{CustomerRecord, OrderPayload};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use service_core::observability::TracedClientExt;
use thiserror::Error;

const MAX_MESSAGE_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("request to ERP failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ERP rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("ERP responded {status} with an unreadable error body")]
    MalformedResponse { status: StatusCode },
}

impl SubmitError {
    /// Server-provided explanation, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            SubmitError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Successful ERP answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpAck {
    pub status: StatusCode,
    /// Response body, compacted when it is JSON. Empty if none.
    pub body: String,
}

pub struct ErpClient {
    client: Client,
    settings: ErpApiSettings,
}

impl ErpClient {
    pub fn new(settings: ErpApiSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build ERP HTTP client: {}", e))?;

        Ok(Self { client, settings })
    }

    pub async fn create_order(
        &self,
        payload: &OrderPayload,
        request_id: Option<&str>,
    ) -> Result<ErpAck, SubmitError> {
        self.post(&self.settings.order_url(), payload, request_id)
            .await
    }

    pub async fn create_customer(
        &self,
        record: &CustomerRecord,
        request_id: Option<&str>,
    ) -> Result<ErpAck, SubmitError> {
        self.post(&self.settings.customer_url(), record, request_id)
            .await
    }

    /// POST a JSON body with trace context propagation.
    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        request_id: Option<&str>,
    ) -> Result<ErpAck, SubmitError> {
        let response = self
            .client
            .traced_post(url)
            .json(body)
            .request_id(request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Failed to send POST request to ERP");
                SubmitError::Transport(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            tracing::info!(url = %url, status = %status, "ERP accepted submission");
            return Ok(ErpAck {
                status,
                body: compact_body(&text),
            });
        }

        tracing::warn!(url = %url, status = %status, body = %text, "ERP rejected submission");
        match extract_error_message(&text) {
            Some(message) => Err(SubmitError::Rejected { status, message }),
            None => Err(SubmitError::MalformedResponse { status }),
        }
    }
}

fn compact_body(text: &str) -> String {
    let trimmed = text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value.to_string(),
        Err(_) => truncate(trimmed),
    }
}

/// Best-effort message from an error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}`,
/// `{"message": "..."}`, a bare JSON string, or plain text. HTML pages and
/// empty bodies yield `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(message)) => non_blank(&message),
        Ok(Value::Object(map)) => ["error", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(message_from_value)),
        Ok(_) => None,
        Err(_) if trimmed.starts_with('<') => None,
        Err(_) => non_blank(trimmed),
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(message) => non_blank(message),
        Value::Object(map) => map.get("message").and_then(message_from_value),
        _ => None,
    }
}

fn non_blank(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate(trimmed))
    }
}

fn truncate(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((cut, _)) => format!("{}…", &message[..cut]),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error": "CardCode duplicado"}"#).as_deref(),
            Some("CardCode duplicado")
        );
    }

    #[test]
    fn extracts_nested_and_alternate_fields() {
        assert_eq!(
            extract_error_message(r#"{"error": {"code": -10, "message": "Invalid item"}}"#)
                .as_deref(),
            Some("Invalid item")
        );
        assert_eq!(
            extract_error_message(r#"{"status": "fail", "message": "Sin stock"}"#).as_deref(),
            Some("Sin stock")
        );
    }

    #[test]
    fn extracts_bare_string_and_plain_text() {
        assert_eq!(
            extract_error_message(r#""Fecha invalida""#).as_deref(),
            Some("Fecha invalida")
        );
        assert_eq!(
            extract_error_message("  Conexion a SAP rechazada \n").as_deref(),
            Some("Conexion a SAP rechazada")
        );
    }

    #[test]
    fn unreadable_bodies_yield_none() {
        assert_eq!(extract_error_message(""), None);
        assert_eq!(extract_error_message("   "), None);
        assert_eq!(extract_error_message("<html><body>500</body></html>"), None);
        assert_eq!(extract_error_message(r#"{"error": 42}"#), None);
        assert_eq!(extract_error_message("[1, 2]"), None);
    }

    #[test]
    fn long_messages_are_truncated() {
        let message = extract_error_message(&"x".repeat(1000)).unwrap();
        assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS + 1);
        assert!(message.ends_with('…'));
    }

    #[test]
    fn success_body_is_compacted() {
        assert_eq!(compact_body("{ \"id\" : 15 }\n"), r#"{"id":15}"#);
        assert_eq!(compact_body(" ok "), "ok");
        assert_eq!(compact_body(""), "");
    }
}

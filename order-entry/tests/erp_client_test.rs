//! ERP client behaviour against a mock HTTP server.

use order_entry::config::ErpApiSettings;
use order_entry::models::{build_payload, CustomerDraft, OrderState};
use order_entry::services::erp_client::{ErpClient, SubmitError};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ErpClient {
    ErpClient::new(ErpApiSettings::new(server.uri())).expect("Failed to build ERP client")
}

#[tokio::test]
async fn order_is_posted_as_json_with_request_id() {
    let server = MockServer::start().await;
    let order = OrderState::with_identity("OV-4321", "2026-10-18");
    let payload = build_payload(&order);

    Mock::given(method("POST"))
        .and(path("/guardar_orden.php"))
        .and(header("x-request-id", "req-7"))
        .and(header_exists("content-type"))
        .and(body_json(json!({
            "cliente_codigo": "",
            "cliente_nombre": "",
            "documento": "",
            "fecha": "2026-10-18",
            "direccion": "",
            "total": 0.0,
            "detalles": [],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "DocEntry": 9 })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .create_order(&payload, Some("req-7"))
        .await
        .unwrap();

    assert_eq!(ack.status, StatusCode::OK);
    assert_eq!(ack.body, r#"{"DocEntry":9}"#);
}

#[tokio::test]
async fn customer_error_body_becomes_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/guardar_cliente.php"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": "LicTradNum invalido" })),
        )
        .mount(&server)
        .await;

    let record = CustomerDraft {
        tax_id: "123".to_string(),
        name: "Test".to_string(),
        ..Default::default()
    }
    .record();

    let err = client_for(&server)
        .create_customer(&record, None)
        .await
        .unwrap_err();

    match err {
        SubmitError::Rejected { status, message } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(message, "LicTradNum invalido");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let payload = build_payload(&OrderState::with_identity("OV-1", "2026-10-18"));
    let err = client_for(&server)
        .create_order(&payload, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SubmitError::MalformedResponse { status } if status == StatusCode::SERVICE_UNAVAILABLE
    ));
    assert!(err.detail().is_none());
}

#[tokio::test]
async fn unreachable_erp_is_transport_error() {
    // Nothing listens on the discard port
    let client = ErpClient::new(ErpApiSettings::new("http://127.0.0.1:9")).unwrap();
    let payload = build_payload(&OrderState::with_identity("OV-1", "2026-10-18"));

    let err = client.create_order(&payload, None).await.unwrap_err();

    assert!(matches!(err, SubmitError::Transport(_)));
}

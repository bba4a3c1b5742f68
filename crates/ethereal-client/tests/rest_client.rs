//! REST client against a mock HTTP server.

mod common;

use alloy::primitives::U256;
use ethereal_client::{ClientConfig, ClientError, IntentReceipt, RestClient};
use ethereal_core::{CancelIntent, SignedEnvelope};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

async fn client(server: &MockServer) -> RestClient {
    RestClient::new(&ClientConfig::with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn fetch_rpc_config_accepts_bare_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rpc_config_json()))
        .mount(&server)
        .await;

    let config = client(&server).await.fetch_rpc_config().await.unwrap();
    assert_eq!(config.domain.chain_id, U256::from(996353u64));
    assert_eq!(config.signature_types.get("CancelOrder").unwrap(), CANCEL_ORDER);
}

#[tokio::test]
async fn fetch_rpc_config_accepts_wrapped_body_and_string_chain_id() {
    let server = MockServer::start().await;
    let mut body = rpc_config_json();
    body["domain"]["chainId"] = json!("996353");
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": body })))
        .mount(&server)
        .await;

    let config = client(&server).await.fetch_rpc_config().await.unwrap();
    assert_eq!(config.domain.chain_id, U256::from(996353u64));
}

#[tokio::test]
async fn fetch_rpc_config_accepts_hex_chain_id() {
    let server = MockServer::start().await;
    let mut body = rpc_config_json();
    body["domain"]["chainId"] = json!("0xf3401");
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = client(&server).await.fetch_rpc_config().await.unwrap();
    assert_eq!(config.domain.chain_id, U256::from(996353u64));
}

#[tokio::test]
async fn fetch_subaccounts_queries_checksummed_sender() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/subaccount"))
        .and(query_param("sender", CHECKSUM_ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(subaccounts_json()))
        .expect(1)
        .mount(&server)
        .await;

    let subaccounts = client(&server)
        .await
        .fetch_subaccounts(key_manager().address())
        .await
        .unwrap();
    assert_eq!(subaccounts.len(), 1);
    assert_eq!(subaccounts[0].name, SUBACCOUNT_NAME);
}

#[tokio::test]
async fn non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server).await.fetch_rpc_config().await.unwrap_err();
    match &err {
        ClientError::Transport { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "ethereal error 503: maintenance");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"domain\": 7}"))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).await.fetch_rpc_config().await,
        Err(ClientError::Decode(_))
    ));
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    let rest = RestClient::new(&ClientConfig::with_base_url("http://127.0.0.1:1")).unwrap();
    assert!(matches!(rest.fetch_rpc_config().await, Err(ClientError::Http(_))));
}

#[tokio::test]
async fn submit_envelope_posts_json_to_order_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/order"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "data": { "clientOrderId": "c-1", "quantity": "0.5", "side": 0 },
            "signature": "0xabc"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "ord-1", "clientOrderId": "c-1", "filled": "0", "result": "Ok" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = SignedEnvelope {
        data: order_intent("c-1"),
        signature: "0xabc".to_string(),
    };
    let receipt = client(&server).await.submit_envelope(&envelope).await.unwrap();
    let created = receipt.into_created().unwrap();
    assert_eq!(created.id, "ord-1");
    assert_eq!(created.client_order_id.as_deref(), Some("c-1"));
}

#[tokio::test]
async fn submit_envelope_routes_cancel_and_decodes_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/order/cancel"))
        .and(body_partial_json(json!({ "data": { "orderIds": ["ord-1", "ord-2"] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "ord-1", "result": "Ok" },
                { "id": "ord-2", "result": "NotFound" }
            ]
        })))
        .mount(&server)
        .await;

    let envelope = SignedEnvelope {
        data: CancelIntent::new(vec!["ord-1".into(), "ord-2".into()]).into(),
        signature: "0xabc".to_string(),
    };
    let receipt = client(&server).await.submit_envelope(&envelope).await.unwrap();
    let IntentReceipt::Cancelled(cancelled) = receipt else {
        panic!("expected cancellation receipt");
    };
    assert_eq!(cancelled.len(), 2);
    assert_eq!(cancelled[1].result, "NotFound");
}

//! Client bootstrap and single submissions against a mock exchange.

mod common;

use ethereal_client::{ClientConfig, ClientError, EtherealClient};
use ethereal_core::CancelIntent;
use ethereal_signer::SignerError;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

async fn mount_bootstrap(server: &MockServer, subaccounts: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rpc_config_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/subaccount"))
        .and(query_param("sender", CHECKSUM_ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(subaccounts))
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> Result<EtherealClient, ClientError> {
    EtherealClient::connect_with_key(ClientConfig::with_base_url(server.uri()), key_manager()).await
}

#[tokio::test]
async fn connect_installs_domain_and_binds_first_subaccount() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, subaccounts_json()).await;

    let client = connect(&server).await.unwrap();
    assert_eq!(client.domain_separator().unwrap().to_string(), DOMAIN_SEPARATOR);
    assert_eq!(client.subaccount().name, SUBACCOUNT_NAME);
    assert_eq!(client.address().to_checksum(None), CHECKSUM_ADDRESS);
}

#[tokio::test]
async fn connect_without_subaccount_fails() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, json!({ "data": [] })).await;

    match connect(&server).await {
        Err(ClientError::NoSubaccount(sender)) => assert_eq!(sender, CHECKSUM_ADDRESS),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn connect_with_malformed_schema_fails() {
    let server = MockServer::start().await;
    let mut config = rpc_config_json();
    config["signatureTypes"]["TradeOrder"] = json!("address sender bytes32 subaccount");
    Mock::given(method("GET"))
        .and(path("/v1/rpc/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(config))
        .mount(&server)
        .await;

    assert!(matches!(
        connect(&server).await,
        Err(ClientError::Signer(SignerError::Schema(_)))
    ));
}

#[tokio::test]
async fn connect_loads_key_from_configured_env_var() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, subaccounts_json()).await;

    let var = "ETHEREAL_BOOTSTRAP_TEST_PK";
    std::env::set_var(var, format!("0x{PRIVATE_KEY}"));
    let mut config = ClientConfig::with_base_url(server.uri());
    config.private_key_env = var.to_string();
    config.expected_address = Some(CHECKSUM_ADDRESS.to_string());

    let client = EtherealClient::connect(config).await.unwrap();
    assert_eq!(client.address().to_checksum(None), CHECKSUM_ADDRESS);
}

#[tokio::test]
async fn connect_with_missing_key_env_fails_before_any_request() {
    let server = MockServer::start().await;
    let mut config = ClientConfig::with_base_url(server.uri());
    config.private_key_env = "ETHEREAL_BOOTSTRAP_TEST_MISSING".to_string();

    assert!(matches!(
        EtherealClient::connect(config).await,
        Err(ClientError::Key(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn place_order_signs_and_posts_stamped_intent() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, subaccounts_json()).await;
    Mock::given(method("POST"))
        .and(path("/v1/order"))
        .and(body_partial_json(json!({
            "data": {
                "sender": CHECKSUM_ADDRESS,
                "subaccount": SUBACCOUNT_NAME,
                "clientOrderId": "c-1",
                "onchainId": 2,
                "price": "3000.25"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "ord-1", "clientOrderId": "c-1", "filled": "0", "result": "Ok" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await.unwrap();
    let created = client.place_order(order("c-1")).await.unwrap();
    assert_eq!(created.id, "ord-1");

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.url.path() == "/v1/order")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    let signature = body["signature"].as_str().unwrap();
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 132);
    assert!(!body["data"]["nonce"].as_str().unwrap().is_empty());
    assert!(body["data"]["signedAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn cancel_orders_posts_to_cancel_endpoint() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, subaccounts_json()).await;
    Mock::given(method("POST"))
        .and(path("/v1/order/cancel"))
        .and(body_partial_json(json!({ "data": { "orderIds": ["ord-1"] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "ord-1", "result": "Ok" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await.unwrap();
    let cancelled = client
        .cancel_orders(CancelIntent::new(vec!["ord-1".into()]))
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, "ord-1");
}

#[tokio::test]
async fn rejected_order_surfaces_status_and_body() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, subaccounts_json()).await;
    Mock::given(method("POST"))
        .and(path("/v1/order"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid signature"))
        .mount(&server)
        .await;

    let client = connect(&server).await.unwrap();
    let err = client.place_order(order("c-1")).await.unwrap_err();
    assert_eq!(err.to_string(), "ethereal error 400: invalid signature");
}

#[tokio::test]
async fn batch_orders_keeps_input_order() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, subaccounts_json()).await;
    for id in ["a", "b", "c"] {
        Mock::given(method("POST"))
            .and(path("/v1/order"))
            .and(body_partial_json(json!({ "data": { "clientOrderId": id } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": format!("ord-{id}"), "clientOrderId": id }
            })))
            .mount(&server)
            .await;
    }

    let client = connect(&server).await.unwrap();
    let results = client
        .batch_orders(vec![order("a"), order("b"), order("c")])
        .await
        .into_all()
        .unwrap();

    let ids: Vec<String> = results
        .into_iter()
        .map(|r| r.into_created().unwrap().id)
        .collect();
    assert_eq!(ids, vec!["ord-a", "ord-b", "ord-c"]);
}

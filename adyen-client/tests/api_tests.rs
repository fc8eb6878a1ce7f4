//! Client tests against an in-process mock of the Adyen endpoints.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use adyen_client::{AdyenApi, ApiError, Endpoints};
use adyen_store::MemoryCache;
use adyen_types::{PosConfig, RecurringType, StaticConfig, StoreConfig, StoreId};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::{Value, json};

const ONECLICK_LISTING: &str = "recurringDetailsResult.creationDate=2026-01-10\
&recurringDetailsResult.details.0.recurringDetailReference=8313147988756818\
&recurringDetailsResult.details.0.variant=visa\
&recurringDetailsResult.details.0.card.number=1111\
&recurringDetailsResult.shopperReference=customer_42";

const RECURRING_LISTING: &str = "recurringDetailsResult.details.0.recurringDetailReference=8313147988756818\
&recurringDetailsResult.details.0.variant=visa\
&recurringDetailsResult.details.1.recurringDetailReference=8413147988756819\
&recurringDetailsResult.details.1.variant=ideal\
&recurringDetailsResult.shopperReference=customer_42";

#[derive(Default)]
struct Mock {
    origin_key_hits: AtomicUsize,
}

async fn pal(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> (StatusCode, String) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, String::new());
    }

    let field = |name: &str| form.get(name).map(String::as_str).unwrap_or_default();
    match field("action") {
        "Recurring.listRecurringDetails" => {
            if field("recurringDetailsRequest.shopperReference") == "broken" {
                return (StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
            }
            match field("recurringDetailsRequest.recurring.contract") {
                "ONECLICK" => (StatusCode::OK, ONECLICK_LISTING.into()),
                "RECURRING" => (StatusCode::OK, RECURRING_LISTING.into()),
                _ => (StatusCode::OK, String::new()),
            }
        }
        "Recurring.disable" => {
            match field("disableRequest.recurringDetailReference") {
                "8313147988756818" => (
                    StatusCode::OK,
                    "disableResult.response=%5Bdetail-successfully-disabled%5D\n".into(),
                ),
                "8413147988756819" => (
                    StatusCode::OK,
                    "Invalid+request%3A+detail+unknown&retry".into(),
                ),
                _ => (StatusCode::OK, "disableResult.response=%5Bunknown%5D".into()),
            }
        }
        _ => (StatusCode::BAD_REQUEST, "unknown action".into()),
    }
}

async fn origin_keys(
    State(mock): State<Arc<Mock>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.origin_key_hits.fetch_add(1, Ordering::SeqCst);
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("checkout-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let domain = body["originDomains"][0].as_str().unwrap_or_default().to_string();
    let mut keys = serde_json::Map::new();
    keys.insert(domain, Value::from("pub.v2.test-origin-key"));
    (StatusCode::OK, Json(json!({ "originKeys": keys })))
}

async fn connected_terminals(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("pos-key") {
        return (StatusCode::FORBIDDEN, Json(json!({})));
    }
    let ids = match body["store"].as_str() {
        Some("AMS01") => vec!["V400m-324688179"],
        _ => vec!["V400m-324688179", "P400Plus-275039202"],
    };
    (StatusCode::OK, Json(json!({ "uniqueTerminalIds": ids })))
}

async fn sync(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "SaleToPOIResponse": {
            "MessageHeader": body["SaleToPOIRequest"]["MessageHeader"].clone(),
            "PaymentResponse": { "Response": { "Result": "Success" } }
        }
    }))
}

async fn spawn_mock() -> (String, Arc<Mock>) {
    let mock = Arc::new(Mock::default());
    let router = Router::new()
        .route("/pal/adapter/httppost", post(pal))
        .route("/v1/originKeys", post(origin_keys))
        .route("/connectedTerminals", post(connected_terminals))
        .route("/sync", post(sync))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), mock)
}

fn store_config() -> StoreConfig {
    StoreConfig {
        merchant_account: Some("TestMerchant".into()),
        ws_username: Some("ws@Company.Test".into()),
        ws_password: Some("secret".into()),
        api_key: Some("checkout-key".into()),
        base_url: Some("https://shop.example.com/".into()),
        pos: PosConfig {
            api_key: Some("pos-key".into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn client_with(config: StaticConfig) -> (AdyenApi, Arc<Mock>) {
    let (base, mock) = spawn_mock().await;
    let api = AdyenApi::new(Arc::new(config), Arc::new(MemoryCache::new()))
        .with_endpoints(Endpoints::uniform(base));
    (api, mock)
}

async fn client() -> (AdyenApi, Arc<Mock>) {
    client_with(StaticConfig::new(store_config())).await
}

#[tokio::test]
async fn test_list_merges_oneclick_and_recurring() {
    let (api, _) = client().await;

    let contracts = api
        .list_recurring_contracts("customer_42", StoreId::DEFAULT)
        .await
        .unwrap();
    assert_eq!(contracts.len(), 2);

    let card = contracts.find("8313147988756818").unwrap();
    assert_eq!(card.recurring_type, Some(RecurringType::OneClickRecurring));
    assert_eq!(card.attribute("card_number"), Some("1111"));
    assert_eq!(card.attribute("creationDate"), Some("2026-01-10"));

    let sepa = contracts.find("8413147988756819").unwrap();
    assert_eq!(sepa.recurring_type, Some(RecurringType::Recurring));
    assert_eq!(sepa.variant(), Some("sepadirectdebit"));
}

#[tokio::test]
async fn test_get_recurring_contract_detail() {
    let (api, _) = client().await;

    let found = api
        .get_recurring_contract_detail("customer_42", "8413147988756819", StoreId::DEFAULT)
        .await
        .unwrap();
    assert_eq!(
        found.unwrap().payment_method.as_deref(),
        Some("adyen_sepa")
    );

    let missing = api
        .get_recurring_contract_detail("customer_42", "0000", StoreId::DEFAULT)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_listing_failure_names_shopper_and_type() {
    let (api, _) = client().await;

    let err = api
        .list_recurring_contracts("broken", StoreId::DEFAULT)
        .await
        .unwrap_err();
    match &err {
        ApiError::BillingAgreement {
            shopper_reference,
            recurring_type,
            source,
        } => {
            assert_eq!(shopper_reference, "broken");
            assert_eq!(*recurring_type, RecurringType::OneClick);
            assert!(matches!(**source, ApiError::Status { status: 500, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("data boom"));
}

#[tokio::test]
async fn test_disable_recurring_contract() {
    let (api, _) = client().await;

    api.disable_recurring_contract("8313147988756818", "customer_42", StoreId::DEFAULT)
        .await
        .unwrap();

    let err = api
        .disable_recurring_contract("0000", "customer_42", StoreId::DEFAULT)
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected(result) => assert_eq!(result, "disableResult.response=[unknown]"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_disable_rejection_keeps_plain_body() {
    let (api, _) = client().await;

    let err = api
        .disable_recurring_contract("8413147988756819", "customer_42", StoreId::DEFAULT)
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected(result) => assert_eq!(result, "Invalid request: detail unknown&retry"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_legacy_request_requires_ws_username() {
    let config = StoreConfig {
        ws_username: None,
        ..store_config()
    };
    let (api, _) = client_with(StaticConfig::new(config)).await;

    let err = api
        .list_recurring_contract_by_type("customer_42", StoreId::DEFAULT, RecurringType::OneClick)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

#[tokio::test]
async fn test_origin_key_is_cached_per_store() {
    let (api, mock) = client().await;

    let first = api.origin_keys(StoreId::DEFAULT).await;
    let second = api.origin_keys(StoreId::DEFAULT).await;
    assert_eq!(first, "pub.v2.test-origin-key");
    assert_eq!(second, first);
    assert_eq!(mock.origin_key_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_origin_key_failure_yields_empty_string() {
    let store = StoreId::new(2);
    let config = StaticConfig::new(store_config()).with_store(
        store,
        StoreConfig {
            api_key: Some("wrong-key".into()),
            ..store_config()
        },
    );
    let (api, mock) = client_with(config).await;

    assert_eq!(api.origin_keys(store).await, "");
    assert_eq!(api.origin_keys(store).await, "");
    // Failures are not cached.
    assert_eq!(mock.origin_key_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_json_request_rejected_key() {
    let (api, _) = client().await;
    let url = format!("{}/v1/originKeys", api.endpoints().checkout_test);

    let err = api
        .do_request_json(
            &json!({ "originDomains": ["https://shop.example.com"] }),
            &url,
            Some("wrong-key"),
            StoreId::DEFAULT,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { status: 401 }));
}

#[tokio::test]
async fn test_connected_terminals() {
    let (api, _) = client().await;
    let terminals = api
        .retrieve_connected_terminals(StoreId::DEFAULT)
        .await
        .unwrap();
    assert_eq!(terminals.unique_terminal_ids.len(), 2);

    let mut config = store_config();
    config.pos.store_code = Some("AMS01".into());
    let (api, _) = client_with(StaticConfig::new(config)).await;
    let terminals = api
        .retrieve_connected_terminals(StoreId::DEFAULT)
        .await
        .unwrap();
    assert_eq!(terminals.unique_terminal_ids, vec!["V400m-324688179"]);
}

#[tokio::test]
async fn test_connected_terminals_without_pos_key() {
    let mut config = store_config();
    config.pos.api_key = None;
    let (api, _) = client_with(StaticConfig::new(config)).await;

    // Falls back to basic auth, which the terminal endpoint refuses.
    let err = api
        .retrieve_connected_terminals(StoreId::DEFAULT)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { status: 403 }));
}

#[tokio::test]
async fn test_terminal_sync_request() {
    let (api, _) = client().await;
    let request = json!({
        "SaleToPOIRequest": {
            "MessageHeader": { "ServiceID": "0207111104", "POIID": "V400m-324688179" }
        }
    });

    let response = api.do_request_sync(&request, StoreId::DEFAULT).await.unwrap();
    assert_eq!(
        response["SaleToPOIResponse"]["MessageHeader"]["ServiceID"],
        "0207111104"
    );
    assert_eq!(
        response["SaleToPOIResponse"]["PaymentResponse"]["Response"]["Result"],
        "Success"
    );
}

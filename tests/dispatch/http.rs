//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use partner_settlement::dispatch::{self, Service};
use partner_settlement::{InMemoryLedger, SettlementStore};
use serde_json::{json, Value};

type SettlementService = Service<SettlementStore<InMemoryLedger>>;

fn test_service() -> Arc<SettlementService> {
    Arc::new(Service::settlement(SettlementStore::new(InMemoryLedger::new())).unwrap())
}

/// Bind to port 0 and return the actual address.
async fn start_server(service: Arc<SettlementService>) -> String {
    let app = dispatch::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn delta(id: &str, loyalty: &str, settlement: &str, currency: &str) -> String {
    json!({
        "summarySettlementId": id,
        "loyaltySettlementAmount": loyalty,
        "settlementAmount": settlement,
        "isoCurrencyLoyalty": currency,
        "isoCurrency": currency
    })
    .to_string()
}

#[tokio::test]
async fn health_lists_operations() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["query"], json!(["getSettlementSummary", "getTransactionDetail"]));
    assert_eq!(body["invoke"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn invoke_then_query_summary() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    for payload in [delta("SUM1", "10", "5", "USD"), delta("SUM1", "3", "2", "EUR")] {
        let resp = client
            .post(format!("{base}/invoke/updateSettlementSummary"))
            .json(&vec![payload])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
    }

    let resp = client
        .post(format!("{base}/query/getSettlementSummary"))
        .json(&vec!["SUM1"])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["loyaltySettlementAmount"], "13");
    assert_eq!(body["settlementAmount"], "7");
    assert_eq!(body["isoCurrency"], "USD");
}

#[tokio::test]
async fn query_missing_is_no_content() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/query/getTransactionDetail"))
        .json(&vec!["ghost"])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn errors_carry_status_and_message() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/invoke/transferFunds"))
        .json(&Vec::<String>::new())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("transferFunds"));

    let resp = client
        .post(format!("{base}/invoke/createInputTransaction"))
        .json(&vec!["{not json"])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("parse error"));
}

#[tokio::test]
async fn wrong_argument_count_over_http() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/query/getSettlementSummary"))
        .json(&vec!["a", "b"])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("incorrect number of arguments"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_updates_on_one_summary_all_land() {
    let service = test_service();
    let base = start_server(service.clone()).await;
    let client = reqwest::Client::new();

    let requests: Vec<_> = (0..32)
        .map(|_| {
            let client = client.clone();
            let url = format!("{base}/invoke/updateSettlementSummary");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&vec![delta("SUM1", "1", "2", "USD")])
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap(), 204);
    }

    let summary = service.store().aggregator().get("SUM1").unwrap().unwrap();
    assert_eq!(summary.loyalty_settlement_amount, rust_decimal::Decimal::from(32));
    assert_eq!(summary.settlement_amount, rust_decimal::Decimal::from(64));
    assert!(service.store().locks().is_empty().unwrap());
}

#[tokio::test]
async fn overflowing_update_is_unprocessable() {
    let base = start_server(test_service()).await;
    let client = reqwest::Client::new();
    let max = "79228162514264337593543950335";

    for expected in [204, 422] {
        let resp = client
            .post(format!("{base}/invoke/updateSettlementSummary"))
            .json(&vec![delta("SUM1", max, "1", "USD")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), expected);
    }

    let resp = client
        .post(format!("{base}/query/getSettlementSummary"))
        .json(&vec!["SUM1"])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["loyaltySettlementAmount"], max);
    assert_eq!(body["settlementAmount"], "1");
}

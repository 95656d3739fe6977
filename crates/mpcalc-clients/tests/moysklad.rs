//! Integration tests for `MoySkladClient` against a wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mpcalc_clients::moysklad::Project;
use mpcalc_clients::{ClientError, HttpSettings, MoySkladClient};

fn settings(max_attempts: u32) -> HttpSettings {
    HttpSettings {
        timeout: Duration::from_secs(5),
        max_attempts,
        retry_delay: Duration::ZERO,
    }
}

fn client(server: &MockServer, max_attempts: u32) -> MoySkladClient {
    MoySkladClient::with_base_url("ms-token", settings(max_attempts), &server.uri())
        .expect("failed to build test MoySkladClient")
}

fn bundle_json(id: &str, code: &str, path_name: &str, component: &str) -> serde_json::Value {
    json!({
        "id": id,
        "code": code,
        "article": format!("ART-{code}"),
        "name": format!("Набор {code}"),
        "pathName": path_name,
        "salePrices": [
            { "value": 40000.0, "priceType": { "name": "Цена продажи" } }
        ],
        "attributes": [
            { "name": "Длина", "value": 10 },
            { "name": "Ширина", "value": 10 },
            { "name": "Высота", "value": 5 }
        ],
        "components": {
            "rows": [{
                "quantity": 2.0,
                "assortment": {
                    "meta": {
                        "href": format!("https://api.moysklad.ru/api/remap/1.2/entity/product/{component}")
                    }
                }
            }]
        }
    })
}

#[tokio::test]
async fn bundles_walk_offset_pages_until_total_is_covered() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entity/bundle"))
        .and(query_param("offset", "0"))
        .and(header("authorization", "Bearer ms-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "size": 150 },
            "rows": [bundle_json("b-1", "111", "WB", "aa-1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/entity/bundle"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "size": 150 },
            "rows": [bundle_json("b-2", "222", "WB", "aa-2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bundles = client(&server, 1).bundles().await;
    assert!(bundles.is_ok(), "expected Ok, got: {bundles:?}");
    let bundles = bundles.unwrap();
    assert_eq!(bundles.len(), 2);
    assert_eq!(bundles[1].id, "b-2");
}

#[tokio::test]
async fn inventory_combines_bundles_and_stock_for_project() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/entity/bundle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "size": 2 },
            "rows": [
                bundle_json("b-1", "111", "Товары/WB", "aa-1"),
                bundle_json("b-2", "222", "Товары/Озон", "aa-2")
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report/stock/all/current"))
        .and(query_param("include", "zeroLines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "assortmentId": "aa-1", "quantity": 7.0 },
            { "assortmentId": "aa-2", "quantity": 4.0 }
        ])))
        .mount(&server)
        .await;

    let items = client(&server, 1)
        .inventory(Project::Wildberries)
        .await
        .expect("inventory");
    assert_eq!(items.len(), 1, "only the WB folder belongs to the project");
    let item = &items["111"];
    assert!((item.stock - 3.0).abs() < 1e-9, "floor(7 / 2), got {}", item.stock);
    assert!((item.prime_cost - 400.0).abs() < 1e-9);
    assert!((item.volume_liters - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn missing_endpoint_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report/stock/all/current"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client(&server, 3).current_stock().await;
    assert!(
        matches!(result, Err(ClientError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report/stock/all/current"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report/stock/all/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 3).current_stock().await;
    assert!(result.is_ok(), "expected Ok after retries, got: {result:?}");
}

#[tokio::test]
async fn retries_stop_at_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report/stock/all/current"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let result = client(&server, 2).current_stock().await;
    assert!(
        matches!(result, Err(ClientError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus 500, got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/report/stock/all/current"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server, 1).current_stock().await;
    assert!(
        matches!(result, Err(ClientError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

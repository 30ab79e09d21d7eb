//! E2E test: heterogeneous exchange feeds → top liquidation zones.
//!
//! Flow:
//! 1. Binance answers with one large buy at 100
//! 2. Bybit answers with one large sell at 105
//! 3. OKX fails to fetch
//! 4. Verify: both zones land in bin 100, through the pipeline and the webhook
//! 5. Verify: permuted feeds and repeated runs give the same answer

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::util::ServiceExt;

use liqmap_connectors::stub::{binance_payload, bybit_payload, okx_payload};
use liqmap_connectors::{
    Exchange, ExchangeEndpoint, ExchangeTable, FetchError, StubTradeSource,
};
use liqmap_domain::HeatmapResult;
use liqmapd::{create_router, ApiState, Pipeline, PipelineError};

fn one_exchange_down_stub() -> StubTradeSource {
    StubTradeSource::new()
        .with_payload(Exchange::Binance, binance_payload("100", "0.5", false))
        .with_payload(Exchange::Bybit, bybit_payload("105", "0.3", "Sell"))
        .with_failure(Exchange::Okx, FetchError::Timeout)
}

fn pipeline_with(table: ExchangeTable, stub: StubTradeSource) -> Pipeline {
    Pipeline::new(table, Arc::new(stub), Duration::from_secs(1))
}

// =============================================================================
// Test: Pipeline E2E
// =============================================================================

#[tokio::test]
async fn test_pipeline_end_to_end_example() {
    let pipeline = pipeline_with(ExchangeTable::default(), one_exchange_down_stub());

    let result = pipeline.run().await.unwrap();

    assert_eq!(
        result,
        HeatmapResult {
            long_liq: 100.0,
            short_liq: 100.0
        }
    );
}

#[tokio::test]
async fn test_pipeline_is_order_independent_and_repeatable() {
    let stub = || {
        StubTradeSource::new()
            .with_payload(
                Exchange::Binance,
                json!([
                    {"price": "64010.5", "qty": "0.9", "isBuyerMaker": false},
                    {"price": "64150.0", "qty": "0.4", "isBuyerMaker": true},
                    {"price": "63990.0", "qty": "0.05", "isBuyerMaker": false}
                ]),
            )
            .with_payload(Exchange::Bybit, bybit_payload("64188", "0.7", "Sell"))
            .with_payload(Exchange::Okx, okx_payload("63955.1", "1.1", "buy"))
    };

    let forward = pipeline_with(ExchangeTable::default(), stub());
    let reversed = pipeline_with(
        ExchangeTable::new(vec![
            ExchangeEndpoint::new(Exchange::Okx),
            ExchangeEndpoint::new(Exchange::Bybit),
            ExchangeEndpoint::new(Exchange::Binance),
        ]),
        stub(),
    );

    let first = forward.run().await.unwrap();
    let second = forward.run().await.unwrap();
    let permuted = reversed.run().await.unwrap();

    // 63900: buy 1.1; 64000: buy 0.9; 64100: sell 0.4 + 0.7
    assert_eq!(first.long_liq, 63_900.0);
    assert_eq!(first.short_liq, 64_100.0);
    assert_eq!(first, second);
    assert_eq!(first, permuted);
}

#[tokio::test]
async fn test_pipeline_all_exchanges_down() {
    let stub = StubTradeSource::new()
        .with_failure(Exchange::Binance, FetchError::Timeout)
        .with_failure(
            Exchange::Bybit,
            FetchError::RequestFailed("connection refused".to_string()),
        )
        .with_failure(
            Exchange::Okx,
            FetchError::Status {
                status: 429,
                body: "Too Many Requests".to_string(),
            },
        );

    let err = pipeline_with(ExchangeTable::default(), stub)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::NoData);
}

// =============================================================================
// Test: Webhook E2E
// =============================================================================

#[tokio::test]
async fn test_webhook_end_to_end_example() {
    let pipeline = pipeline_with(ExchangeTable::default(), one_exchange_down_stub());
    let app = create_router(Arc::new(ApiState {
        pipeline: Arc::new(pipeline),
    }));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let result: HeatmapResult = serde_json::from_slice(&body).unwrap();

    assert_eq!(result.long_liq, 100.0);
    assert_eq!(result.short_liq, 100.0);
}

#[tokio::test]
async fn test_webhook_zero_side_is_not_no_data() {
    // Data exists but only on the sell side: 200 with long_liq = 0.0
    let stub = StubTradeSource::new().with_payload(Exchange::Okx, okx_payload("250", "5", "sell"));
    let app = create_router(Arc::new(ApiState {
        pipeline: Arc::new(pipeline_with(ExchangeTable::default(), stub)),
    }));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let result: HeatmapResult = serde_json::from_slice(&body).unwrap();

    assert_eq!(result.long_liq, 0.0);
    assert_eq!(result.short_liq, 200.0);
}

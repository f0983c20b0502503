//! End-to-end placement tests against a recording stub exchange: validation
//! gating, request shaping, response normalization, and error propagation.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use futures_bot::exchange::{AccountSnapshot, ExchangeError, FuturesExchange, OrderRequest};
use futures_bot::order::ValidationError;
use futures_bot::orders::place_order;

/// Records every create-order call and replays a canned response.
struct StubExchange {
    calls: Mutex<Vec<OrderRequest>>,
    response: Result<Value, ExchangeError>,
}

impl StubExchange {
    fn returning(response: Value) -> Self {
        Self { calls: Mutex::new(Vec::new()), response: Ok(response) }
    }

    fn failing(err: ExchangeError) -> Self {
        Self { calls: Mutex::new(Vec::new()), response: Err(err) }
    }

    fn calls(&self) -> Vec<OrderRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FuturesExchange for StubExchange {
    async fn create_order(&self, req: &OrderRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(req.clone());
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(err) => Err(err.clone().into()),
        }
    }

    async fn account_snapshot(&self) -> Result<AccountSnapshot> {
        Ok(AccountSnapshot { available_balance: 10_000.0 })
    }

    async fn symbol_price(&self, _symbol: &str) -> Result<f64> {
        Ok(50_000.0)
    }
}

fn filled_response() -> Value {
    json!({
        "orderId": 123,
        "status": "FILLED",
        "executedQty": "0.01",
        "avgPrice": "50000",
    })
}

#[tokio::test]
async fn market_order_is_normalized() {
    let stub = StubExchange::returning(filled_response());
    let order_data = json!({
        "symbol": "BTCUSDT",
        "side": "BUY",
        "order_type": "MARKET",
        "quantity": 0.01,
    });

    let result = place_order(&order_data, &stub).await.unwrap();
    assert_eq!(result.order_id, Some(123));
    assert_eq!(result.status.as_deref(), Some("FILLED"));
    assert_eq!(result.executed_qty, "0.01");
    assert_eq!(result.avg_price.as_deref(), Some("50000"));
    assert_eq!(result.raw, filled_response());

    let calls = stub.calls();
    assert_eq!(calls.len(), 1, "exactly one create-order call");
    assert_eq!(calls[0].symbol, "BTCUSDT");
    assert_eq!(calls[0].quantity, 0.01);
    assert_eq!(calls[0].price, None);
    assert_eq!(calls[0].time_in_force, None);
}

#[tokio::test]
async fn limit_order_carries_price_and_gtc() {
    let stub = StubExchange::returning(json!({"orderId": 9, "status": "NEW"}));
    let order_data = json!({
        "symbol": "ETHUSDT",
        "side": "SELL",
        "order_type": "LIMIT",
        "quantity": 0.5,
        "price": 3000.0,
    });

    let result = place_order(&order_data, &stub).await.unwrap();
    assert_eq!(result.order_id, Some(9));
    assert_eq!(result.executed_qty, "0", "missing executedQty defaults to \"0\"");
    assert_eq!(result.avg_price, None);

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].price, Some(3000.0));
    assert_eq!(calls[0].time_in_force.as_deref(), Some("GTC"));
}

#[tokio::test]
async fn limit_without_price_never_reaches_exchange() {
    let stub = StubExchange::returning(filled_response());
    let order_data = json!({
        "symbol": "BTCUSDT",
        "side": "BUY",
        "order_type": "LIMIT",
        "quantity": 0.01,
        "price": null,
    });

    let err = place_order(&order_data, &stub).await.unwrap_err();
    let validation = err
        .downcast_ref::<ValidationError>()
        .expect("should fail with a validation error");
    assert!(validation
        .errors
        .iter()
        .any(|e| e.message == "Price is required for LIMIT orders"));
    assert_eq!(stub.calls().len(), 0, "validation failure must not hit the exchange");
}

#[tokio::test]
async fn invalid_quantity_never_reaches_exchange() {
    let stub = StubExchange::returning(filled_response());
    let order_data = json!({
        "symbol": "BTCUSDT",
        "side": "BUY",
        "order_type": "MARKET",
        "quantity": -0.01,
    });

    let err = place_order(&order_data, &stub).await.unwrap_err();
    let validation = err.downcast_ref::<ValidationError>().unwrap();
    assert!(validation.errors.iter().any(|e| e.field == "quantity"));
    assert_eq!(stub.calls().len(), 0);
}

#[tokio::test]
async fn exchange_rejection_propagates_unchanged() {
    let stub = StubExchange::failing(ExchangeError {
        code: -2019,
        message: "Margin is insufficient.".to_string(),
    });
    let order_data = json!({
        "symbol": "BTCUSDT",
        "side": "BUY",
        "order_type": "MARKET",
        "quantity": 0.01,
    });

    let err = place_order(&order_data, &stub).await.unwrap_err();
    let api = err
        .downcast_ref::<ExchangeError>()
        .expect("exchange error type must survive propagation");
    assert_eq!(api.code, -2019);
    assert_eq!(api.message, "Margin is insufficient.");
    assert_eq!(stub.calls().len(), 1, "single attempt, no retry");
}

#[tokio::test]
async fn market_order_with_price_set_still_omits_it() {
    // Price on a MARKET order is ignored, not sent.
    let stub = StubExchange::returning(filled_response());
    let order_data = json!({
        "symbol": "BTCUSDT",
        "side": "BUY",
        "order_type": "MARKET",
        "quantity": 0.01,
        "price": 42000.0,
    });

    place_order(&order_data, &stub).await.unwrap();
    let calls = stub.calls();
    assert_eq!(calls[0].price, None);
    assert_eq!(calls[0].time_in_force, None);
}

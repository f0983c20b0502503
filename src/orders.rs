//! Order placement: validated input in, one create-order call out,
//! response normalized. Failures are logged here and returned to the caller
//! unchanged; presentation is the caller's job.

use anyhow::Result;
use serde_json::Value;

use crate::exchange::{ExchangeError, FuturesExchange, OrderRequest};
use crate::logging;
use crate::order::{OrderInput, OrderType};

/// Limit orders rest until filled or cancelled.
pub const TIME_IN_FORCE_GTC: &str = "GTC";

/// Normalized placement outcome. `raw` keeps the unmodified exchange
/// response for diagnostics.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order_id: Option<u64>,
    pub status: Option<String>,
    pub executed_qty: String,
    pub avg_price: Option<String>,
    pub raw: Value,
}

impl OrderResult {
    fn from_raw(raw: Value) -> Self {
        Self {
            order_id: raw.get("orderId").and_then(Value::as_u64),
            status: raw.get("status").and_then(Value::as_str).map(str::to_string),
            executed_qty: raw
                .get("executedQty")
                .and_then(Value::as_str)
                .unwrap_or("0")
                .to_string(),
            avg_price: raw.get("avgPrice").and_then(Value::as_str).map(str::to_string),
            raw,
        }
    }
}

/// Validate `order_data` and submit it through `exchange`.
///
/// Exactly one network call on the happy path, single attempt, fail-fast.
/// Validation failures never reach the exchange.
pub async fn place_order(order_data: &Value, exchange: &dyn FuturesExchange) -> Result<OrderResult> {
    let order = match OrderInput::parse(order_data) {
        Ok(order) => order,
        Err(err) => {
            logging::error("orders", &format!("validation error: {}", err));
            return Err(err.into());
        }
    };

    let request = match order.order_type {
        OrderType::Market => OrderRequest {
            symbol: order.symbol.clone(),
            side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: None,
            time_in_force: None,
        },
        OrderType::Limit => OrderRequest {
            symbol: order.symbol.clone(),
            side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: order.price,
            time_in_force: Some(TIME_IN_FORCE_GTC.to_string()),
        },
    };

    match exchange.create_order(&request).await {
        Ok(raw) => {
            let result = OrderResult::from_raw(raw);
            logging::info(
                "orders",
                &format!(
                    "order placed: {} {} {} qty={} order_id={:?} status={:?}",
                    order.side.as_str(),
                    order.order_type.as_str(),
                    order.symbol,
                    order.quantity,
                    result.order_id,
                    result.status
                ),
            );
            Ok(result)
        }
        Err(err) => {
            match err.downcast_ref::<ExchangeError>() {
                Some(api) => logging::error("orders", &format!("exchange API error: {}", api.message)),
                None => logging::error("orders", &format!("unexpected error placing order: {:#}", err)),
            }
            Err(err)
        }
    }
}

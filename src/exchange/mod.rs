//! The exchange capability seam: a narrow trait covering exactly what the
//! order flow needs, so test doubles and alternate venues can be substituted
//! without touching validation or placement logic.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::order::{OrderSide, OrderType};

pub mod binance;
pub mod signing;

/// The venue rejected the request (bad symbol, insufficient margin, ...).
/// Transport and decode failures are not this; they stay plain `anyhow`.
#[derive(Debug, Clone, Error)]
#[error("exchange error {code}: {message}")]
pub struct ExchangeError {
    pub code: i64,
    pub message: String,
}

/// Wire-ready order parameters. The placer fills in `time_in_force` for
/// limit orders; market orders carry neither price nor time-in-force.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
    pub time_in_force: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct AccountSnapshot {
    pub available_balance: f64,
}

#[async_trait]
pub trait FuturesExchange: Send + Sync {
    /// Submit one order. Returns the raw response mapping; the caller
    /// normalizes it.
    async fn create_order(&self, req: &OrderRequest) -> Result<Value>;

    /// Current account state (available balance).
    async fn account_snapshot(&self) -> Result<AccountSnapshot>;

    /// Latest traded price for the pair.
    async fn symbol_price(&self, symbol: &str) -> Result<f64>;
}

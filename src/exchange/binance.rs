//! Signed reqwest client for the Binance USDT-margined futures REST API.
//! Defaults to the futures testnet endpoints.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;

use super::signing::sign_query;
use super::{AccountSnapshot, ExchangeError, FuturesExchange, OrderRequest};
use crate::config::Config;

pub struct BinanceFutures {
    client: Client,
    base: String,
    api_key: String,
    api_secret: String,
    recv_window: u64,
}

#[derive(Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuturesAccount {
    available_balance: String,
}

#[derive(Deserialize)]
struct PriceTicker {
    price: String,
}

impl BinanceFutures {
    pub fn new(cfg: &Config) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("BINANCE_API_KEY not set"))?;
        let api_secret = cfg
            .api_secret
            .clone()
            .ok_or_else(|| anyhow!("BINANCE_SECRET_KEY not set"))?;
        Ok(Self {
            client: Client::new(),
            base: cfg.fapi_base.clone(),
            api_key,
            api_secret,
            recv_window: cfg.recv_window,
        })
    }

    fn timestamp_ms() -> u64 {
        chrono::Utc::now().timestamp_millis() as u64
    }

    fn order_query(req: &OrderRequest, timestamp: u64, recv_window: u64) -> String {
        let mut query = format!(
            "symbol={}&side={}&type={}&quantity={:.8}&timestamp={}&recvWindow={}",
            req.symbol,
            req.side.as_str(),
            req.order_type.as_str(),
            req.quantity,
            timestamp,
            recv_window
        );
        if let Some(price) = req.price {
            query.push_str(&format!("&price={:.8}", price));
        }
        if let Some(tif) = &req.time_in_force {
            query.push_str(&format!("&timeInForce={}", tif));
        }
        query
    }

    async fn signed_request(&self, method: Method, path: &str, query: String) -> Result<Value> {
        let signature = sign_query(&query, &self.api_secret)?;
        let url = format!("{}{}?{}&signature={}", self.base, path, query, signature);

        let resp = self
            .client
            .request(method, &url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: ApiError = serde_json::from_str(&body)
                .unwrap_or(ApiError { code: -1, msg: body.clone() });
            return Err(ExchangeError { code: err.code, message: err.msg }.into());
        }

        serde_json::from_str(&body).context("decoding exchange response")
    }
}

#[async_trait]
impl FuturesExchange for BinanceFutures {
    async fn create_order(&self, req: &OrderRequest) -> Result<Value> {
        let query = Self::order_query(req, Self::timestamp_ms(), self.recv_window);
        self.signed_request(Method::POST, "/fapi/v1/order", query).await
    }

    async fn account_snapshot(&self) -> Result<AccountSnapshot> {
        let query = format!("timestamp={}&recvWindow={}", Self::timestamp_ms(), self.recv_window);
        let raw = self.signed_request(Method::GET, "/fapi/v2/account", query).await?;
        let account: FuturesAccount =
            serde_json::from_value(raw).context("decoding account snapshot")?;
        Ok(AccountSnapshot {
            available_balance: account.available_balance.parse().unwrap_or(0.0),
        })
    }

    async fn symbol_price(&self, symbol: &str) -> Result<f64> {
        // Ticker endpoint is public; no signature needed.
        let url = format!("{}/fapi/v1/ticker/price?symbol={}", self.base, symbol);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let err: ApiError = serde_json::from_str(&body)
                .unwrap_or(ApiError { code: -1, msg: body.clone() });
            return Err(ExchangeError { code: err.code, message: err.msg }.into());
        }

        let ticker: PriceTicker = serde_json::from_str(&body).context("decoding price ticker")?;
        Ok(ticker.price.parse().unwrap_or(0.0))
    }
}

//! Environment-driven configuration, read once at startup and passed
//! explicitly into the components that need it.

use std::path::PathBuf;

use crate::logging::Level;
use crate::order::MIN_NOTIONAL_USDT;

pub const TESTNET_FAPI_BASE: &str = "https://testnet.binancefuture.com";
pub const PROD_FAPI_BASE: &str = "https://fapi.binance.com";

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub fapi_base: String,
    pub recv_window: u64,
    pub log_path: PathBuf,
    pub log_level: Level,
    pub min_notional: f64,
}

impl Config {
    pub fn from_env() -> Self {
        let testnet = std::env::var("BINANCE_TESTNET")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);
        Self {
            api_key: std::env::var("BINANCE_API_KEY").ok(),
            api_secret: std::env::var("BINANCE_SECRET_KEY").ok(),
            fapi_base: fapi_base(testnet, std::env::var("BINANCE_FAPI_BASE").ok()),
            recv_window: std::env::var("RECV_WINDOW").ok().and_then(|v| v.parse().ok()).unwrap_or(5000),
            log_path: std::env::var("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs/trading_bot.log")),
            log_level: Level::from_env(),
            min_notional: std::env::var("MIN_NOTIONAL").ok().and_then(|v| v.parse().ok()).unwrap_or(MIN_NOTIONAL_USDT),
        }
    }
}

fn fapi_base(testnet: bool, explicit: Option<String>) -> String {
    match explicit {
        Some(base) => base,
        None if testnet => TESTNET_FAPI_BASE.to_string(),
        None => PROD_FAPI_BASE.to_string(),
    }
}

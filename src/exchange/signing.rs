use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a query string with HMAC-SHA256 (Binance style).
/// Returns hex-encoded signature.
pub fn sign_query(query: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("HMAC error: {}", e))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_query() {
        let query = "symbol=BTCUSDT&side=BUY&type=LIMIT&timeInForce=GTC&quantity=0.001&price=50000&timestamp=1234567890000";
        let secret = "test_secret";
        let sig = sign_query(query, secret).unwrap();
        assert!(!sig.is_empty());
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_query_deterministic() {
        let a = sign_query("timestamp=1", "s").unwrap();
        let b = sign_query("timestamp=1", "s").unwrap();
        let c = sign_query("timestamp=2", "s").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

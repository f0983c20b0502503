//! Order input schema: field-level and cross-field validation, plus the
//! minimum-notional business rule.
//!
//! `OrderInput::parse` takes a raw JSON mapping (the shape the CLI builds
//! from its arguments) and either yields a validated, immutable order or a
//! `ValidationError` listing every violated field at once.

use std::fmt;

use serde_json::Value;

/// Exchange minimum order value in quote currency (USDT).
pub const MIN_NOTIONAL_USDT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "BUY" => Some(OrderSide::Buy),
            "SELL" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }

    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "MARKET" => Some(OrderType::Market),
            "LIMIT" => Some(OrderType::Limit),
            _ => None,
        }
    }
}

/// One violated field: path plus a human-readable reason.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Malformed or inconsistent order input. Carries every detected violation,
/// not just the first.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order input:")?;
        for err in &self.errors {
            write!(f, " [{}: {}]", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A validated futures order. Construction goes through `parse`; instances
/// are immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
}

impl OrderInput {
    pub fn parse(data: &Value) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let symbol = match data.get("symbol").and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            Some(_) => {
                errors.push(FieldError::new("symbol", "symbol must not be empty"));
                String::new()
            }
            None => {
                errors.push(FieldError::new("symbol", "symbol is required"));
                String::new()
            }
        };

        let side = match data.get("side").and_then(Value::as_str) {
            Some(s) => {
                let parsed = OrderSide::from_wire(s);
                if parsed.is_none() {
                    errors.push(FieldError::new("side", format!("side must be BUY or SELL, got {:?}", s)));
                }
                parsed
            }
            None => {
                errors.push(FieldError::new("side", "side is required"));
                None
            }
        };

        let order_type = match data.get("order_type").and_then(Value::as_str) {
            Some(s) => {
                let parsed = OrderType::from_wire(s);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "order_type",
                        format!("order_type must be MARKET or LIMIT, got {:?}", s),
                    ));
                }
                parsed
            }
            None => {
                errors.push(FieldError::new("order_type", "order_type is required"));
                None
            }
        };

        let quantity = match data.get("quantity") {
            Some(v) if !v.is_null() => match as_number(v) {
                Some(q) if q > 0.0 => Some(q),
                Some(q) => {
                    errors.push(FieldError::new(
                        "quantity",
                        format!("quantity must be greater than zero, got {}", q),
                    ));
                    None
                }
                None => {
                    errors.push(FieldError::new("quantity", "quantity must be a number"));
                    None
                }
            },
            _ => {
                errors.push(FieldError::new("quantity", "quantity is required"));
                None
            }
        };

        let price = match data.get("price") {
            None | Some(Value::Null) => {
                if order_type == Some(OrderType::Limit) {
                    errors.push(FieldError::new("price", "Price is required for LIMIT orders"));
                }
                None
            }
            Some(v) => match as_number(v) {
                Some(p) if p > 0.0 => Some(p),
                Some(p) => {
                    errors.push(FieldError::new(
                        "price",
                        format!("price must be greater than zero, got {}", p),
                    ));
                    None
                }
                None => {
                    errors.push(FieldError::new("price", "price must be a number"));
                    None
                }
            },
        };

        match (side, order_type, quantity) {
            (Some(side), Some(order_type), Some(quantity)) if errors.is_empty() => Ok(Self {
                symbol,
                side,
                order_type,
                quantity,
                price,
            }),
            _ => Err(ValidationError { errors }),
        }
    }
}

/// Accepts JSON numbers and numeric strings; nothing else.
fn as_number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

/// True iff `notional` coerces to a number at or above `min_notional`.
/// Advisory only: callers warn, they do not block placement.
pub fn meets_minimum_notional(notional: &Value, min_notional: f64) -> bool {
    as_number(notional).map(|n| n >= min_notional).unwrap_or(false)
}

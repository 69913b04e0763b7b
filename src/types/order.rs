//! Scalar aliases and order-entry enums.
//!
//! Prices are signed 64-bit integers in venue ticks (the smallest currency
//! increment); currency scaling happens outside the engine. Quantities are
//! signed so that non-positive values can be detected and rejected as
//! no-ops rather than wrapping.

use serde::{Deserialize, Serialize};

/// Price in integer ticks.
pub type Price = i64;

/// Quantity of units. Only strictly positive quantities may rest.
pub type Qty = i64;

/// Unique order identifier, assigned by the caller.
pub type OrderId = u64;

/// Timestamp in nanoseconds. The engine records it on resting orders and
/// stamps it on trades but never interprets it.
pub type TimeNs = u64;

/// Order side: bid or offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid).
    Buy,
    /// Sell order (ask).
    Sell,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Short uppercase label for display.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

/// Order type carried on entry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Executes at the given price or better; the residual rests.
    Limit,
    /// Fully aggressive; any residual is discarded, never rests.
    Market,
}

//! Decimal ↔ tick conversion for the harness boundary.
//!
//! The engine itself only ever sees integer tick counts; these helpers let
//! a feed adapter or test harness translate human decimal prices (e.g.
//! "10.10" with a 0.01 tick) into ticks and back without floating point.
//!
//! ## Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use tickbook::types::ticks::{from_ticks, to_ticks};
//!
//! let tick = Decimal::new(1, 2); // 0.01
//! assert_eq!(to_ticks("10.10", tick), Some(1010));
//! assert_eq!(from_ticks(1010, tick), "10.1");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::types::Price;

/// Convert a decimal price string to integer ticks.
///
/// Returns `None` when the string does not parse, the tick size is not
/// strictly positive, or the price is not an exact multiple of the tick
/// (off-tick prices are a venue rejection, not something to round).
pub fn to_ticks(s: &str, tick_size: Decimal) -> Option<Price> {
    if tick_size <= Decimal::ZERO {
        return None;
    }
    let price = Decimal::from_str(s).ok()?;
    let quotient = price.checked_div(tick_size)?;
    if !quotient.fract().is_zero() {
        return None;
    }
    quotient.to_i64()
}

/// Convert integer ticks back to a decimal price string, with trailing
/// zeros trimmed.
pub fn from_ticks(ticks: Price, tick_size: Decimal) -> String {
    let price = Decimal::from(ticks) * tick_size;
    price.normalize().to_string()
}

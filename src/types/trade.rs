//! Trade record produced by the matching routines.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, Qty, Side, TimeNs};

/// A single execution between an incoming taker and a resting maker.
///
/// ## Terminology
///
/// - **Maker**: the resting order that was already in the book.
/// - **Taker**: the incoming aggressive order that triggered the match.
///
/// ## Price Discovery
///
/// A trade always executes at the maker's price (the price of the level
/// being crossed), never at the taker's. A taker sweeping several levels
/// produces trades at monotonically worsening prices from its own
/// perspective.
///
/// ## Example
///
/// ```
/// use tickbook::types::{Side, Trade};
///
/// let trade = Trade::new(202, 101, Side::Buy, 1010, 75, 3);
/// assert_eq!(trade.price, 1010); // the maker's level price
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Incoming order that triggered the match. Market-order ids are
    /// propagated here as well, even though they are never indexed.
    pub taker_id: OrderId,

    /// Resting order that was matched against.
    pub maker_id: OrderId,

    /// Side of the taker.
    pub taker_side: Side,

    /// Execution price in ticks; always the maker's level price.
    pub price: Price,

    /// Executed quantity, strictly positive.
    pub qty: Qty,

    /// Timestamp of the command that produced this trade.
    pub ts: TimeNs,
}

impl Trade {
    /// Create a new trade record.
    pub fn new(
        taker_id: OrderId,
        maker_id: OrderId,
        taker_side: Side,
        price: Price,
        qty: Qty,
        ts: TimeNs,
    ) -> Self {
        Self {
            taker_id,
            maker_id,
            taker_side,
            price,
            qty,
            ts,
        }
    }

    /// Notional value of this trade in tick-units (price * qty), widened
    /// so it cannot overflow for any valid price/qty pair.
    pub fn notional(&self) -> i128 {
        self.price as i128 * self.qty as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_new() {
        let trade = Trade::new(202, 101, Side::Buy, 1010, 75, 3);

        assert_eq!(trade.taker_id, 202);
        assert_eq!(trade.maker_id, 101);
        assert_eq!(trade.taker_side, Side::Buy);
        assert_eq!(trade.price, 1010);
        assert_eq!(trade.qty, 75);
        assert_eq!(trade.ts, 3);
    }

    #[test]
    fn test_trade_notional() {
        let trade = Trade::new(1, 2, Side::Sell, 1_000_000, 5_000_000, 0);
        assert_eq!(trade.notional(), 5_000_000_000_000i128);
    }

    #[test]
    fn test_trade_json_roundtrip() {
        let trade = Trade::new(202, 101, Side::Buy, 1010, 75, 3);
        let line = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&line).unwrap();
        assert_eq!(trade, back);
    }
}

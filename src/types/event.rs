//! Textual order-entry event schema, used for replay and testing.
//!
//! One event per line, JSON-encoded. The schema deliberately carries every
//! field of an entry command so a single record type covers adds, cancels
//! and replaces; price and quantity are optional because cancels carry
//! neither and replaces may change only one of them.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderType, Price, Qty, Side, TimeNs};

/// Kind of record in a replay stream.
///
/// `Trade` and `Snapshot` records are outputs; a replay treats them as
/// annotations and skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Add,
    Cancel,
    Replace,
    Trade,
    Snapshot,
}

/// An inbound order event.
///
/// ## Example
///
/// ```
/// use tickbook::types::{EventType, OrderEvent, Side};
///
/// let ev = OrderEvent::limit_add(1, 101, Side::Sell, 1010, 100);
/// let line = ev.to_line().unwrap();
/// assert_eq!(OrderEvent::from_line(&line).unwrap(), ev);
/// assert_eq!(ev.kind, EventType::Add);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event timestamp in nanoseconds.
    pub ts: TimeNs,

    /// Record kind.
    #[serde(rename = "type")]
    pub kind: EventType,

    /// Order identifier.
    pub id: OrderId,

    /// Order side.
    pub side: Side,

    /// Limit or market.
    pub order_type: OrderType,

    /// Price in ticks; absent on cancels and market adds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub px: Option<Price>,

    /// Quantity; absent on cancels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<Qty>,
}

impl OrderEvent {
    /// A limit-order add.
    pub fn limit_add(ts: TimeNs, id: OrderId, side: Side, px: Price, qty: Qty) -> Self {
        Self {
            ts,
            kind: EventType::Add,
            id,
            side,
            order_type: OrderType::Limit,
            px: Some(px),
            qty: Some(qty),
        }
    }

    /// A market-order add. Market orders carry no price.
    pub fn market_add(ts: TimeNs, id: OrderId, side: Side, qty: Qty) -> Self {
        Self {
            ts,
            kind: EventType::Add,
            id,
            side,
            order_type: OrderType::Market,
            px: None,
            qty: Some(qty),
        }
    }

    /// A cancel of a resting order.
    pub fn cancel(ts: TimeNs, id: OrderId, side: Side) -> Self {
        Self {
            ts,
            kind: EventType::Cancel,
            id,
            side,
            order_type: OrderType::Limit,
            px: None,
            qty: None,
        }
    }

    /// A replace; `px` and `qty` are each optional and keep the old value
    /// when absent.
    pub fn replace(
        ts: TimeNs,
        id: OrderId,
        side: Side,
        px: Option<Price>,
        qty: Option<Qty>,
    ) -> Self {
        Self {
            ts,
            kind: EventType::Replace,
            id,
            side,
            order_type: OrderType::Limit,
            px,
            qty,
        }
    }

    /// Encode as one JSON line.
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from one JSON line.
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

//! Single-symbol order book with price-time priority matching.
//!
//! ## Architecture
//!
//! The book couples three structures that must stay consistent:
//!
//! - **Slab arena**: every resting [`OrderNode`] lives in a
//!   `slab::Slab`, addressed by stable `usize` keys. Freed slots are
//!   recycled by the slab's internal free list.
//! - **Ladders**: `BTreeMap` from price to [`PriceLevel`], one per side.
//!   Bid keys are wrapped in `Reverse` so both ladders iterate best-first:
//!   highest bid first, lowest ask first.
//! - **Order index**: `HashMap` from order id to slab key, covering
//!   exactly the orders currently linked into a level.
//!
//! ## Complexity
//!
//! | Operation | Cost |
//! |-----------|------|
//! | add (resting) | O(log n) level lookup |
//! | cancel by id | O(1) + O(log n) empty-level erase |
//! | replace (shrink) | O(1) + O(log n) level lookup |
//! | best bid/ask | O(1) first entry |
//! | match | O(log n) per level crossed |
//!
//! ## Example
//!
//! ```
//! use tickbook::orderbook::OrderBook;
//! use tickbook::types::Side;
//!
//! let mut book = OrderBook::new();
//! book.add_limit(101, Side::Sell, 1010, 100, 1);
//! book.add_limit(201, Side::Buy, 1000, 50, 2);
//!
//! assert_eq!(book.best_bid(), Some(1000));
//! assert_eq!(book.best_ask(), Some(1010));
//!
//! let trades = book.add_limit(202, Side::Buy, 1015, 75, 3);
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].price, 1010); // maker's price, not the taker's
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use slab::Slab;

use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::{OrderId, Price, Qty, Side, TimeNs, Trade};

/// Single-symbol, single-threaded limit order book and matching engine.
///
/// All operations are synchronous: a command is fully processed, including
/// any matching it triggers, before it returns. The book exclusively owns
/// every node and level; dropping the book releases everything.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Arena for all resting order nodes.
    orders: Slab<OrderNode>,

    /// Buy ladder; `Reverse` keys make the first entry the highest bid.
    bids: BTreeMap<Reverse<Price>, PriceLevel>,

    /// Sell ladder; the first entry is the lowest ask.
    asks: BTreeMap<Price, PriceLevel>,

    /// id -> slab key for every resident order, nothing else.
    order_index: HashMap<OrderId, usize>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::new(),
        }
    }

    /// Create a book with the arena and index pre-sized for `capacity`
    /// resting orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::with_capacity(capacity),
        }
    }

    // ========================================================================
    // Order entry
    // ========================================================================

    /// Add a limit order.
    ///
    /// Matches the incoming quantity against the opposite ladder while the
    /// taker's price still crosses; any residual rests at `price` on this
    /// side. Returns the trades in the order they were produced. A
    /// non-positive `qty` is a valid no-op returning no trades.
    ///
    /// The caller guarantees `id` is not already resident whenever any
    /// quantity would rest; violating that is a programmer error (asserted
    /// in debug builds).
    pub fn add_limit(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        qty: Qty,
        ts: TimeNs,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();
        if qty <= 0 {
            return trades;
        }

        let mut remaining = qty;
        match side {
            Side::Buy => self.match_buy_against_asks(id, &mut remaining, price, ts, &mut trades),
            Side::Sell => self.match_sell_against_bids(id, &mut remaining, price, ts, &mut trades),
        }
        if remaining > 0 {
            self.rest(id, side, price, remaining, ts);
        }

        self.debug_validate();
        trades
    }

    /// Add a market order.
    ///
    /// Matches with an unbounded price cap: a buy crosses any ask, a sell
    /// any bid. Whatever the opposite ladder cannot fill is discarded; a
    /// market order never rests and its id is never indexed (it appears on
    /// trades for reporting only).
    pub fn add_market(&mut self, id: OrderId, side: Side, qty: Qty, ts: TimeNs) -> Vec<Trade> {
        let mut trades = Vec::new();
        if qty <= 0 {
            return trades;
        }

        let mut remaining = qty;
        match side {
            Side::Buy => {
                self.match_buy_against_asks(id, &mut remaining, Price::MAX, ts, &mut trades)
            }
            Side::Sell => {
                self.match_sell_against_bids(id, &mut remaining, Price::MIN, ts, &mut trades)
            }
        }

        self.debug_validate();
        trades
    }

    /// Cancel a resting order by id. Returns `false` when the id is not
    /// resident.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        let Some(&key) = self.order_index.get(&id) else {
            return false;
        };
        self.remove_resting(key);
        self.debug_validate();
        true
    }

    /// Replace a resting order's price and/or quantity.
    ///
    /// Returns `false` when the id is not resident. Otherwise, in order:
    ///
    /// 1. Effective price and quantity both unchanged: no-op, `true`.
    /// 2. Price unchanged and quantity strictly shrinking (but positive):
    ///    shrink in place, keeping the order's position in its queue.
    /// 3. Anything else (price change, size increase, or non-positive new
    ///    quantity): cancel and, when the effective quantity is positive,
    ///    re-add as a fresh limit order stamped with `ts`. Time priority is
    ///    lost, and the re-add may cross.
    pub fn replace(
        &mut self,
        id: OrderId,
        new_price: Option<Price>,
        new_qty: Option<Qty>,
        ts: TimeNs,
    ) -> bool {
        let Some(&key) = self.order_index.get(&id) else {
            return false;
        };
        let (side, old_price, old_qty) = {
            let node = &self.orders[key];
            (node.side, node.price, node.qty)
        };
        let price = new_price.unwrap_or(old_price);
        let qty = new_qty.unwrap_or(old_qty);

        if price == old_price && qty == old_qty {
            return true;
        }

        if price == old_price && qty > 0 && qty < old_qty {
            let delta = old_qty - qty;
            self.orders[key].qty = qty;
            match side {
                Side::Buy => self
                    .bids
                    .get_mut(&Reverse(price))
                    .expect("resident order without level")
                    .reduce_total(delta),
                Side::Sell => self
                    .asks
                    .get_mut(&price)
                    .expect("resident order without level")
                    .reduce_total(delta),
            }
            self.debug_validate();
            return true;
        }

        self.remove_resting(key);
        if qty > 0 {
            // Re-add loses time priority; trades it produces are not
            // returned from replace.
            let _ = self.add_limit(id, side, price, qty, ts);
        }
        self.debug_validate();
        true
    }

    // ========================================================================
    // Queries (read-only, no allocation)
    // ========================================================================

    /// Highest resting buy price, if any.
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next().map(|r| r.0)
    }

    /// Lowest resting sell price, if any.
    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// best_ask - best_bid, when both sides are populated.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Total resting quantity at `price` on `side`, zero when no such
    /// level exists.
    pub fn depth_at(&self, side: Side, price: Price) -> Qty {
        match side {
            Side::Buy => self.bids.get(&Reverse(price)).map_or(0, |l| l.total_qty),
            Side::Sell => self.asks.get(&price).map_or(0, |l| l.total_qty),
        }
    }

    /// Number of resident orders.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// True when nothing rests on either side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of populated bid price levels.
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of populated ask price levels.
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// True when `id` currently rests on the book.
    #[inline]
    pub fn contains_order(&self, id: OrderId) -> bool {
        self.order_index.contains_key(&id)
    }

    /// Pre-allocated arena capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Per-level depth on one side, best price first. Allocates the
    /// returned vector; meant for snapshots and tests, not the hot path.
    pub fn depth_snapshot(&self, side: Side) -> Vec<(Price, Qty)> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .map(|(&Reverse(price), level)| (price, level.total_qty))
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .map(|(&price, level)| (price, level.total_qty))
                .collect(),
        }
    }

    // ========================================================================
    // Resting insertion and removal
    // ========================================================================

    /// Create a node for the unfilled remainder and link it at the tail of
    /// its level, creating the level when absent.
    fn rest(&mut self, id: OrderId, side: Side, price: Price, qty: Qty, ts: TimeNs) {
        debug_assert!(
            !self.order_index.contains_key(&id),
            "order id {id} already resident"
        );
        let key = self.orders.insert(OrderNode::new(id, side, price, qty, ts));
        match side {
            Side::Buy => {
                let level = self
                    .bids
                    .entry(Reverse(price))
                    .or_insert_with(|| PriceLevel::new(price));
                level.push_back(key, &mut self.orders);
            }
            Side::Sell => {
                let level = self
                    .asks
                    .entry(price)
                    .or_insert_with(|| PriceLevel::new(price));
                level.push_back(key, &mut self.orders);
            }
        }
        self.order_index.insert(id, key);
    }

    /// Unlink a resident order, drop it from the index and the arena, and
    /// erase its level if that left the level empty.
    fn remove_resting(&mut self, key: usize) {
        let (id, side, price) = {
            let node = &self.orders[key];
            (node.id, node.side, node.price)
        };
        match side {
            Side::Buy => {
                let level = self
                    .bids
                    .get_mut(&Reverse(price))
                    .expect("resident order without level");
                level.remove(key, &mut self.orders);
                if level.is_empty() {
                    self.bids.remove(&Reverse(price));
                }
            }
            Side::Sell => {
                let level = self
                    .asks
                    .get_mut(&price)
                    .expect("resident order without level");
                level.remove(key, &mut self.orders);
                if level.is_empty() {
                    self.asks.remove(&price);
                }
            }
        }
        self.order_index.remove(&id);
        self.orders.remove(key);
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Cross an incoming buy against the ask ladder while the best ask is
    /// within `taker_price`.
    ///
    /// Trades execute at the maker's level price. Fully filled makers are
    /// unlinked, de-indexed and released one at a time, and a level is
    /// erased the instant it empties, so every intermediate state seen
    /// from outside still satisfies the book invariants.
    fn match_buy_against_asks(
        &mut self,
        taker_id: OrderId,
        taker_qty: &mut Qty,
        taker_price: Price,
        ts: TimeNs,
        out: &mut Vec<Trade>,
    ) {
        while *taker_qty > 0 {
            let Some(&level_price) = self.asks.keys().next() else {
                break;
            };
            if level_price > taker_price {
                break; // no cross
            }

            let level = self
                .asks
                .get_mut(&level_price)
                .expect("peeked ask level vanished");
            while *taker_qty > 0 {
                let Some(maker_key) = level.head else {
                    break;
                };
                let maker = self
                    .orders
                    .get_mut(maker_key)
                    .expect("ask level head not in arena");
                let traded = (*taker_qty).min(maker.qty);

                out.push(Trade::new(
                    taker_id,
                    maker.id,
                    Side::Buy,
                    level_price,
                    traded,
                    ts,
                ));

                maker.qty -= traded;
                level.reduce_total(traded);
                *taker_qty -= traded;

                if maker.qty == 0 {
                    let maker_id = maker.id;
                    level.remove(maker_key, &mut self.orders);
                    self.order_index.remove(&maker_id);
                    self.orders.remove(maker_key);
                }
            }
            if level.is_empty() {
                self.asks.remove(&level_price);
            }
        }
    }

    /// Mirror of [`Self::match_buy_against_asks`]: cross an incoming sell
    /// against the bid ladder while the best bid is at or above
    /// `taker_price`.
    fn match_sell_against_bids(
        &mut self,
        taker_id: OrderId,
        taker_qty: &mut Qty,
        taker_price: Price,
        ts: TimeNs,
        out: &mut Vec<Trade>,
    ) {
        while *taker_qty > 0 {
            let Some(&Reverse(level_price)) = self.bids.keys().next() else {
                break;
            };
            if level_price < taker_price {
                break; // no cross
            }

            let level = self
                .bids
                .get_mut(&Reverse(level_price))
                .expect("peeked bid level vanished");
            while *taker_qty > 0 {
                let Some(maker_key) = level.head else {
                    break;
                };
                let maker = self
                    .orders
                    .get_mut(maker_key)
                    .expect("bid level head not in arena");
                let traded = (*taker_qty).min(maker.qty);

                out.push(Trade::new(
                    taker_id,
                    maker.id,
                    Side::Sell,
                    level_price,
                    traded,
                    ts,
                ));

                maker.qty -= traded;
                level.reduce_total(traded);
                *taker_qty -= traded;

                if maker.qty == 0 {
                    let maker_id = maker.id;
                    level.remove(maker_key, &mut self.orders);
                    self.order_index.remove(&maker_id);
                    self.orders.remove(maker_key);
                }
            }
            if level.is_empty() {
                self.bids.remove(&Reverse(level_price));
            }
        }
    }

    // ========================================================================
    // Invariant validation (debug builds only)
    // ========================================================================

    #[inline]
    fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        self.validate();
    }

    /// Walk both ladders and the index and assert every structural
    /// invariant in one pass. Compiled only in debug builds; release
    /// builds carry no trace of it.
    #[cfg(debug_assertions)]
    pub fn validate(&self) {
        let mut resident = 0usize;

        let mut last: Option<Price> = None;
        for (&Reverse(price), level) in &self.bids {
            if let Some(prev) = last {
                assert!(price < prev, "bid ladder out of order: {price} after {prev}");
            }
            last = Some(price);
            resident += self.validate_level(level, Side::Buy, price);
        }

        let mut last: Option<Price> = None;
        for (&price, level) in &self.asks {
            if let Some(prev) = last {
                assert!(price > prev, "ask ladder out of order: {price} after {prev}");
            }
            last = Some(price);
            resident += self.validate_level(level, Side::Sell, price);
        }

        // Index <-> resident-node bijection: every linked node was checked
        // to appear in the index, so equal counts close the loop.
        assert_eq!(resident, self.order_index.len(), "index size mismatch");
        assert_eq!(resident, self.orders.len(), "arena holds unlinked nodes");
        for (&id, &key) in &self.order_index {
            let node = self.orders.get(key).expect("index points at vacant slot");
            assert_eq!(node.id, id, "index id does not match node id");
        }

        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            assert!(bid < ask, "book is crossed: bid {bid} >= ask {ask}");
        }
    }

    #[cfg(debug_assertions)]
    fn validate_level(&self, level: &PriceLevel, side: Side, price: Price) -> usize {
        assert_eq!(level.price, price, "level price does not match ladder key");
        assert!(!level.is_empty(), "empty level left in ladder at {price}");
        assert_eq!(level.head.is_some(), level.tail.is_some());

        let mut sum: Qty = 0;
        let mut count = 0usize;
        let mut prev: Option<usize> = None;
        let mut cursor = level.head;
        while let Some(key) = cursor {
            let node = self.orders.get(key).expect("linked node not in arena");
            assert_eq!(node.side, side, "node side does not match ladder");
            assert_eq!(node.price, level.price, "node price does not match level");
            assert!(node.qty > 0, "resident node with non-positive qty");
            assert_eq!(node.prev, prev, "broken back-link at {price}");
            assert_eq!(
                self.order_index.get(&node.id),
                Some(&key),
                "linked node missing from index"
            );
            sum += node.qty;
            count += 1;
            prev = Some(key);
            cursor = node.next;
        }
        assert_eq!(level.tail, prev, "tail does not match last node");
        assert_eq!(sum, level.total_qty, "total_qty drifted at {price}");
        assert_eq!(count, level.order_count, "order_count drifted at {price}");

        count
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

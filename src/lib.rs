//! # tickbook
//!
//! Single-symbol, single-threaded limit order book and matching engine.
//!
//! The crate is the kernel a venue or backtester builds around: it ingests
//! order-entry commands (limit add, market add, cancel, replace) and
//! produces the trades those commands generate under price-time priority,
//! while keeping a consistent view of resting liquidity at every price.
//! Feed adapters, symbol routing, persistence and market-data publication
//! are external collaborators.
//!
//! ## Design
//!
//! - **Types**: integer-tick prices, signed quantities, caller-assigned ids
//! - **OrderBook**: slab node arena + sorted ladders + O(1) id index
//! - **Replay**: a textual event schema for driving a book from a script
//!
//! Trades always execute at the resting (maker) price; equal-price orders
//! fill in arrival order. The engine has no internal locking and no I/O:
//! callers serialize commands, and each command is fully processed before
//! the next is accepted.
//!
//! ## Example
//!
//! ```
//! use tickbook::{OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//! book.add_limit(101, Side::Sell, 1010, 100, 1);
//!
//! let trades = book.add_limit(202, Side::Buy, 1015, 75, 2);
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].maker_id, 101);
//! assert_eq!(book.depth_at(Side::Sell, 1010), 25);
//! ```

pub mod orderbook;
pub mod replay;
pub mod types;

pub use orderbook::{OrderBook, OrderNode, PriceLevel};
pub use replay::{ReplayError, ReplaySummary};
pub use types::{EventType, OrderEvent, OrderId, OrderType, Price, Qty, Side, TimeNs, Trade};

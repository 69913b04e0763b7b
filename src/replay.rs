//! Drive a book from a textual event script.
//!
//! A script is a sequence of JSON-encoded [`OrderEvent`] lines; blank
//! lines and lines starting with `#` are skipped. The replay applies each
//! entry command to the book and collects the trades it produces. `trade`
//! and `snapshot` records in the input are outputs from a previous run and
//! are skipped. Input arrives as an in-memory string; reading files or
//! sockets is the caller's business.

use thiserror::Error;
use tracing::{debug, info};

use crate::orderbook::OrderBook;
use crate::types::{EventType, OrderEvent, OrderType, Trade};

/// Why a single event could not be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("add event missing a quantity")]
    MissingQty,
    #[error("limit add missing a price")]
    MissingPrice,
}

/// Why a replay stopped.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: malformed event: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: {source}")]
    Apply {
        line: usize,
        #[source]
        source: ApplyError,
    },
}

/// What applying one event did to the book.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// An add executed; the vector holds its trades (possibly empty when
    /// the order rested or was a non-positive-qty no-op).
    Trades(Vec<Trade>),
    /// A cancel or replace found its order.
    Accepted,
    /// A cancel or replace named an unknown id.
    Rejected,
    /// A trade/snapshot annotation, not a command.
    Skipped,
}

/// Totals for one replay run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Commands applied to the book (excludes skipped annotations).
    pub events_applied: usize,
    /// Cancels/replaces that named an unknown id.
    pub events_rejected: usize,
    /// Every trade produced, in stream order.
    pub trades: Vec<Trade>,
}

/// Apply one parsed event to the book.
pub fn apply_event(book: &mut OrderBook, ev: &OrderEvent) -> Result<Outcome, ApplyError> {
    match ev.kind {
        EventType::Add => {
            let qty = ev.qty.ok_or(ApplyError::MissingQty)?;
            let trades = match ev.order_type {
                OrderType::Limit => {
                    let px = ev.px.ok_or(ApplyError::MissingPrice)?;
                    book.add_limit(ev.id, ev.side, px, qty, ev.ts)
                }
                OrderType::Market => book.add_market(ev.id, ev.side, qty, ev.ts),
            };
            Ok(Outcome::Trades(trades))
        }
        EventType::Cancel => {
            if book.cancel(ev.id) {
                Ok(Outcome::Accepted)
            } else {
                Ok(Outcome::Rejected)
            }
        }
        EventType::Replace => {
            if book.replace(ev.id, ev.px, ev.qty, ev.ts) {
                Ok(Outcome::Accepted)
            } else {
                Ok(Outcome::Rejected)
            }
        }
        EventType::Trade | EventType::Snapshot => Ok(Outcome::Skipped),
    }
}

/// Run a whole script against the book.
///
/// Stops at the first malformed or inapplicable line, reporting its
/// 1-based line number.
pub fn replay(book: &mut OrderBook, script: &str) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();

    for (idx, raw) in script.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let ev = OrderEvent::from_line(text).map_err(|source| ReplayError::Malformed {
            line,
            source,
        })?;
        let outcome =
            apply_event(book, &ev).map_err(|source| ReplayError::Apply { line, source })?;

        match outcome {
            Outcome::Trades(trades) => {
                debug!(line, id = ev.id, trades = trades.len(), "applied add");
                summary.events_applied += 1;
                summary.trades.extend(trades);
            }
            Outcome::Accepted => {
                debug!(line, id = ev.id, kind = ?ev.kind, "applied");
                summary.events_applied += 1;
            }
            Outcome::Rejected => {
                debug!(line, id = ev.id, kind = ?ev.kind, "unknown id");
                summary.events_applied += 1;
                summary.events_rejected += 1;
            }
            Outcome::Skipped => {
                debug!(line, kind = ?ev.kind, "skipped annotation");
            }
        }
    }

    info!(
        applied = summary.events_applied,
        rejected = summary.events_rejected,
        trades = summary.trades.len(),
        "replay finished"
    );
    Ok(summary)
}

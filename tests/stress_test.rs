//! Stress tests: high volumes of mixed order flow under a seeded RNG.
//!
//! These runs verify that the engine stays stable and deterministic under
//! load and that matched flow keeps the book bounded. They execute in
//! debug builds too, where the internal validator re-checks every
//! invariant after each command, so they are also a broad structural
//! sweep. Latency targets live in `benches/matching.rs`, not here.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tickbook::{OrderBook, Side, Trade};

const BASE_PRICE: i64 = 50_000;

#[derive(Debug, Clone)]
enum Command {
    Limit { side: Side, price: i64, qty: i64 },
    Market { side: Side, qty: i64 },
    CancelRandom(usize),
    ShrinkRandom(usize),
}

/// Deterministic mixed command stream. Same seed, same commands.
fn generate_commands(count: usize, seed: u64) -> Vec<Command> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut commands = Vec::with_capacity(count);

    for _ in 0..count {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let roll: f64 = rng.gen();
        let cmd = if roll < 0.70 {
            Command::Limit {
                side,
                price: BASE_PRICE + rng.gen_range(-1000..=1000),
                qty: rng.gen_range(1..=500),
            }
        } else if roll < 0.80 {
            Command::Market {
                side,
                qty: rng.gen_range(1..=500),
            }
        } else if roll < 0.92 {
            Command::CancelRandom(rng.gen_range(0..usize::MAX))
        } else {
            Command::ShrinkRandom(rng.gen_range(0..usize::MAX))
        };
        commands.push(cmd);
    }

    commands
}

/// Run a command stream against a fresh book, returning the full trade
/// stream and the final book.
fn run_commands(commands: &[Command]) -> (Vec<Trade>, OrderBook) {
    let mut book = OrderBook::with_capacity(commands.len());
    let mut trades = Vec::new();
    let mut resting: Vec<u64> = Vec::new();
    let mut next_id: u64 = 1;
    let mut ts: u64 = 0;

    for cmd in commands {
        ts += 1;
        match cmd {
            Command::Limit { side, price, qty } => {
                let id = next_id;
                next_id += 1;
                trades.extend(book.add_limit(id, *side, *price, *qty, ts));
                if book.contains_order(id) {
                    resting.push(id);
                }
            }
            Command::Market { side, qty } => {
                let id = next_id;
                next_id += 1;
                trades.extend(book.add_market(id, *side, *qty, ts));
            }
            Command::CancelRandom(pick) => {
                if !resting.is_empty() {
                    let id = resting.swap_remove(pick % resting.len());
                    // May already be gone through matching; both outcomes
                    // are legal.
                    book.cancel(id);
                }
            }
            Command::ShrinkRandom(pick) => {
                if !resting.is_empty() {
                    let id = resting[pick % resting.len()];
                    book.replace(id, None, Some(1), ts);
                }
            }
        }
    }

    (trades, book)
}

#[test]
fn stress_mixed_flow_stays_consistent() {
    // Debug builds re-validate the whole book after every command, which
    // is O(resident orders); keep the volume where that stays fast.
    const COUNT: usize = 10_000;

    let commands = generate_commands(COUNT, 42);
    let (trades, book) = run_commands(&commands);

    assert!(!trades.is_empty(), "expected matching to occur");
    for t in &trades {
        assert!(t.qty > 0);
    }
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid < ask, "book finished crossed");
    }

    // Depth bookkeeping agrees with the per-level snapshots.
    for side in [Side::Buy, Side::Sell] {
        for (price, qty) in book.depth_snapshot(side) {
            assert!(qty > 0);
            assert_eq!(book.depth_at(side, price), qty);
        }
    }
}

#[test]
fn stress_identical_seeds_are_deterministic() {
    const COUNT: usize = 5_000;
    const SEED: u64 = 12345;

    let commands = generate_commands(COUNT, SEED);
    let (trades1, book1) = run_commands(&commands);
    let (trades2, book2) = run_commands(&commands);

    assert_eq!(trades1, trades2, "trade streams must match run to run");
    assert_eq!(book1.depth_snapshot(Side::Buy), book2.depth_snapshot(Side::Buy));
    assert_eq!(book1.depth_snapshot(Side::Sell), book2.depth_snapshot(Side::Sell));

    let other = generate_commands(COUNT, SEED + 1);
    let (trades3, _) = run_commands(&other);
    assert_ne!(trades1, trades3, "different seeds should diverge");
}

#[test]
fn stress_balanced_flow_keeps_book_bounded() {
    const COUNT: usize = 10_000;
    const MAX_RESIDENT: usize = 8_000;

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut book = OrderBook::with_capacity(MAX_RESIDENT);
    let mut max_seen = 0usize;

    // Tight spread around the base price so flow keeps crossing.
    for i in 0..COUNT {
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let price = BASE_PRICE + rng.gen_range(-100..=100);
        let qty = rng.gen_range(1..=50);
        book.add_limit(i as u64 + 1, side, price, qty, i as u64);
        max_seen = max_seen.max(book.order_count());
    }

    assert!(
        max_seen < MAX_RESIDENT,
        "book grew to {max_seen} resident orders"
    );
}

//! Demonstration binary for the matching engine.
//!
//! Drives the canonical add / cross / cancel / market sequence against a
//! fresh book, then runs the same sequence again through the replay layer.
//! Not part of the engine contract; the library is the product.

use tickbook::replay::replay;
use tickbook::types::ticks::from_ticks;
use tickbook::{OrderBook, Side, Trade};

use rust_decimal::Decimal;

fn print_trades(trades: &[Trade]) {
    if trades.is_empty() {
        println!("No trades");
        return;
    }
    for t in trades {
        println!(
            "TRADE taker={} maker={} side={} px={} qty={} ts={}",
            t.taker_id,
            t.maker_id,
            t.taker_side.as_str(),
            t.price,
            t.qty,
            t.ts
        );
    }
}

fn print_book_state(book: &OrderBook) {
    let tick = Decimal::new(1, 2); // 0.01 per tick for display
    let fmt = |px: Option<i64>| px.map_or("(none)".to_string(), |p| from_ticks(p, tick));
    println!("-------------------------------------------------");
    println!(
        " Best Bid: {}  | Best Ask: {}",
        fmt(book.best_bid()),
        fmt(book.best_ask())
    );
    println!("-------------------------------------------------");
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut book = OrderBook::new();

    println!("=== tickbook demo ===");

    println!("Add sell 101: 100 @ 10.10");
    book.add_limit(101, Side::Sell, 1010, 100, 1);
    println!("Add buy  201: 50 @ 10.00");
    book.add_limit(201, Side::Buy, 1000, 50, 2);
    print_book_state(&book);

    println!("\nAdd buy 202: 75 @ 10.15 (crossing)");
    let trades = book.add_limit(202, Side::Buy, 1015, 75, 3);
    print_trades(&trades);
    print_book_state(&book);

    println!("\nAdd sell 103: 50 @ 10.20 (rests)");
    book.add_limit(103, Side::Sell, 1020, 50, 4);
    print_book_state(&book);

    println!("\nCancel order 201");
    book.cancel(201);
    print_book_state(&book);

    println!("\nMarket buy 104 qty=60");
    let trades = book.add_market(104, Side::Buy, 60, 5);
    print_trades(&trades);
    print_book_state(&book);

    // Same session expressed as a replay script.
    let script = r#"
        {"ts":1,"type":"add","id":101,"side":"sell","order_type":"limit","px":1010,"qty":100}
        {"ts":2,"type":"add","id":201,"side":"buy","order_type":"limit","px":1000,"qty":50}
        {"ts":3,"type":"add","id":202,"side":"buy","order_type":"limit","px":1015,"qty":75}
        {"ts":4,"type":"add","id":103,"side":"sell","order_type":"limit","px":1020,"qty":50}
        {"ts":4,"type":"cancel","id":201,"side":"buy","order_type":"limit"}
        {"ts":5,"type":"add","id":104,"side":"buy","order_type":"market","qty":60}
    "#;

    println!("\n=== same session via replay ===");
    let mut replayed = OrderBook::new();
    match replay(&mut replayed, script) {
        Ok(summary) => {
            println!(
                "applied {} events, {} trades:",
                summary.events_applied,
                summary.trades.len()
            );
            print_trades(&summary.trades);
            print_book_state(&replayed);
        }
        Err(e) => eprintln!("replay failed: {e}"),
    }

    println!("\nDemo complete.");
}

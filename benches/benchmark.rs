use criterion::{Criterion, criterion_group, criterion_main};

use order_book_engine::book::OrderBook;
use order_book_engine::ids::{Price, Quantity, UserId};
use order_book_engine::types::{OrderSide, TimeInForce};

/// Populates only the ask side, `depth` price levels deep, so an incoming
/// taker has to walk many levels without the setup itself triggering a
/// cross (bids, if any, stay strictly below the lowest ask).
fn setup_asks(depth: u64, orders_per_level: u64) -> OrderBook<std::io::Sink> {
    let mut ob = OrderBook::new(std::io::sink());
    for price in 1..=depth {
        for _ in 0..orders_per_level {
            ob.add_limit(UserId(0), OrderSide::Sell, Price(price), Quantity(1), TimeInForce::GTC)
                .unwrap();
        }
    }
    ob
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("market order walking every ask level", |b| {
        b.iter_batched(
            || setup_asks(depth, orders_per_level),
            |mut ob| {
                ob.add_market(UserId(1), OrderSide::Buy, Quantity(depth * orders_per_level))
                    .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("limit order crossing half the book", |b| {
        b.iter_batched(
            || setup_asks(depth, orders_per_level),
            |mut ob| {
                ob.add_limit(
                    UserId(1),
                    OrderSide::Buy,
                    Price(depth / 2),
                    Quantity(depth * orders_per_level / 2),
                    TimeInForce::GTC,
                )
                .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("cancel a resting order", |b| {
        b.iter_batched(
            || {
                let mut ob = setup_asks(depth, orders_per_level);
                let r = ob
                    .add_limit(UserId(2), OrderSide::Buy, Price(1), Quantity(1), TimeInForce::GTC)
                    .unwrap();
                (ob, r.order_id)
            },
            |(mut ob, order_id)| {
                ob.cancel(order_id);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);

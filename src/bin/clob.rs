//! `clob` — drive an `OrderBook` from the command line.
//!
//! `add`/`market`/`cancel`/`book` operate an in-memory book for a single
//! invocation; `simulate` and `replay` are grounded in the reference
//! implementation's own CLI (generate noisy order flow to a log, or
//! reconstruct state from one).

use std::fs::File;
use std::io::{BufReader, Write as _};
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use order_book_engine::book::OrderBook;
use order_book_engine::ids::{Price, Quantity, UserId};
use order_book_engine::replay::replay_into;
use order_book_engine::types::{OrderSide, TimeInForce};

#[derive(Parser)]
#[command(name = "clob")]
#[command(author, version, about = "Central Limit Order Book with replay abilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Admit a resting-eligible limit order.
    Add {
        user_id: u64,
        side: OrderSide,
        price: u64,
        quantity: u64,
        #[arg(long, default_value = "GTC")]
        tif: TimeInForce,
    },
    /// Admit a market order.
    Market { user_id: u64, side: OrderSide, quantity: u64 },
    /// Cancel a resting order by id.
    Cancel { order_id: u64 },
    /// Print the current book (built from a log on stdin, if any).
    Book,
    /// Generate plausible, but random events.
    Simulate {
        /// Write the generated event log here.
        #[arg(long)]
        output: Option<String>,
        /// Minimum delay between simulated events, in milliseconds.
        #[arg(long, default_value_t = 10)]
        min_sim_sleep: u64,
        /// Maximum delay between simulated events, in milliseconds.
        #[arg(long, default_value_t = 1250)]
        max_sim_sleep: u64,
        /// Number of events to generate.
        #[arg(long, default_value_t = 100)]
        count: u64,
    },
    /// Ingest an event log and show the final state.
    Replay {
        /// Read events from this file path.
        #[arg(long)]
        input: String,
    },
}

// `OrderSide`/`TimeInForce` parse here via their `FromStr` impls in
// `types.rs` (clap's derive falls back to `FromStr` when a field type
// doesn't implement `ValueEnum`) — they already accept "BUY"/"SELL" and
// "GTC"/"IOC" to match the event log's own wire format.

fn print_book<S: order_book_engine::events::EventSink>(book: &OrderBook<S>) {
    println!("------ Order Book ------");
    println!("best bid: {:?}", book.best_bid());
    println!("best ask: {:?}", book.best_ask());
    println!("-------------------------");
}

fn run_simulate(output: Option<String>, min_ms: u64, max_ms: u64, count: u64) -> anyhow::Result<()> {
    if min_ms > max_ms {
        anyhow::bail!("--min-sim-sleep cannot be greater than --max-sim-sleep");
    }

    let sink: Box<dyn std::io::Write> = match &output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let mut book = OrderBook::new(sink);

    // Mean inter-arrival inside [min_ms, max_ms], exponentially distributed
    // and clamped to the bounds, mirroring the teacher's Poisson-arrival
    // simulator without the HTTP round trip.
    let mean_ms = ((min_ms + max_ms) as f64 / 2.0).max(1.0);
    let inter_arrival = Exp::new(1.0 / mean_ms)?;
    let mut rng = rand::rng();

    for i in 0..count {
        let side = if rng.random_bool(0.5) {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };
        let qty = Quantity(rng.random_range(1..=20));
        let user_id = UserId(rng.random_range(0..10));

        let result = if rng.random_bool(0.8) {
            let price = Price(rng.random_range(1..=100));
            let tif = if rng.random_bool(0.9) {
                TimeInForce::GTC
            } else {
                TimeInForce::IOC
            };
            book.add_limit(user_id, side, price, qty, tif)
        } else {
            book.add_market(user_id, side, qty)
        };

        match result {
            Ok(payload) => info!(i, ?side, ?qty, status = ?payload.status, "sim tick"),
            Err(reason) => warn!(i, ?side, ?qty, %reason, "sim order rejected"),
        }

        let delay_ms = (inter_arrival.sample(&mut rng) as u64).clamp(min_ms, max_ms);
        std::thread::sleep(Duration::from_millis(delay_ms));
    }

    info!(event_seq = book.event_seq(), "simulation done");
    Ok(())
}

fn run_replay(input: String) -> anyhow::Result<()> {
    let file = File::open(&input)?;
    let mut book = OrderBook::new(std::io::sink());
    let applied = replay_into(BufReader::new(file), &mut book)?;
    info!(applied, "replay complete");
    print_book(&book);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Add {
            user_id,
            side,
            price,
            quantity,
            tif,
        } => {
            let mut book = OrderBook::new(std::io::stdout());
            match book.add_limit(UserId(user_id), side, Price(price), Quantity(quantity), tif) {
                Ok(payload) => println!("{payload:?}"),
                Err(reason) => println!("rejected: {reason}"),
            }
        }
        Commands::Market { user_id, side, quantity } => {
            let mut book = OrderBook::new(std::io::stdout());
            match book.add_market(UserId(user_id), side, Quantity(quantity)) {
                Ok(payload) => println!("{payload:?}"),
                Err(reason) => println!("rejected: {reason}"),
            }
        }
        Commands::Cancel { order_id } => {
            let mut book = OrderBook::new(std::io::stdout());
            let found = book.cancel(order_book_engine::ids::OrderId(order_id));
            println!("cancelled: {found}");
        }
        Commands::Book => {
            let book = OrderBook::new(std::io::sink());
            print_book(&book);
        }
        Commands::Simulate {
            output,
            min_sim_sleep,
            max_sim_sleep,
            count,
        } => run_simulate(output, min_sim_sleep, max_sim_sleep, count)?,
        Commands::Replay { input } => run_replay(input)?,
    }

    std::io::stdout().flush().ok();
    Ok(())
}

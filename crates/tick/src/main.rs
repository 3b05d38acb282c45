mod cli;
mod spider;

// remote imports
use clap::Parser;
use cli::{Cli, TraceLevel};
use deadpool_postgres::Pool;
use dotenv::var;
use serde::Serialize;
use tick_spider::stock;
use tick_spider::trades::{self, PgTradeStore};
use tracing::{debug, subscriber, trace, warn, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// set the trace level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

// connection pool from .env SMARTTICK_URL
fn connect() -> anyhow::Result<Pool> {
    trace!("creating smarttick connection pool");
    let pool = tick_spider::pg_pool(&var("SMARTTICK_URL")?)?;
    debug!("smarttick connection pool established");
    Ok(pool)
}

// results go to stdout, logs to stderr
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    use cli::Commands::*;
    match cli.command {
        // `tick import <TARGET>`
        Import { target } => spider::run(&connect()?, target, tui).await?,

        // `tick summary <SYMBOL>`
        Summary { symbol } => {
            let store = PgTradeStore::new(connect()?);
            let summary = trades::monthly_summary(&store, &symbol).await?;
            if summary.skipped > 0 {
                warn!("{} trades without a valid date were left out", summary.skipped);
            }
            print_json(&summary.months)?;
        }

        // `tick trades [SYMBOL] [--limit N]`
        Trades { symbol, limit } => {
            let store = PgTradeStore::new(connect()?);
            let trades = match symbol {
                Some(symbol) => store.trades_by_symbol(&symbol).await?,
                None => store.recent_trades(limit).await?,
            };
            if trades.is_empty() {
                warn!("no trade data found");
            }
            print_json(&trades)?;
        }

        // `tick quote <SYMBOL>`
        Quote { symbol } => {
            let finnhub = stock::finnhub::Finnhub::from_env()?;
            let quote = finnhub.quote(&symbol.trim().to_uppercase()).await?;
            print_json(&quote)?;
        }

        // `tick search <QUERY>`
        Search { query } => {
            let listings =
                stock::symbols::search(&connect()?, &query, stock::symbols::SEARCH_LIMIT).await?;
            print_json(&listings)?;
        }
    }

    Ok(())
}

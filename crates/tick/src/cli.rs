use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// Without it, progress bars are shown instead of logs.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load data into the PostgreSQL database (smarttick).
    Import {
        #[command(subcommand)]
        target: Target,
    },

    /// Monthly buy/sell volume of congressional trades in a stock, as JSON.
    Summary {
        /// Stock symbol, e.g. AAPL.
        symbol: String,
    },

    /// Congressional trades, most recent first, as JSON.
    Trades {
        /// Only list trades in this stock.
        symbol: Option<String>,

        /// Number of trades to list, when no symbol is given.
        #[arg(short, long, default_value_t = tick_spider::trades::store::DEFAULT_LIMIT)]
        limit: i64,
    },

    /// Real-time quote of a stock, as JSON.
    Quote {
        /// Stock symbol, e.g. AAPL.
        symbol: String,
    },

    /// Search imported stocks by symbol or company name.
    Search {
        /// Start of a symbol or company name.
        query: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Target {
    /// Replace all congressional trades with those in a scraped JSON file.
    Trades {
        /// Path to the scraped trades, e.g. 1yeartrade.json.
        file: PathBuf,

        /// Number of trades sent to the database per batch.
        #[arg(long, default_value_t = tick_spider::trades::import::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Replace all politician portraits with those in a JSON file.
    Images {
        /// Path to the portraits, e.g. data/PoliticianPhotos.json.
        file: PathBuf,
    },

    /// Daily prices of a stock from Tiingo.
    Prices {
        /// Stock symbol, e.g. AAPL.
        symbol: String,

        /// First day, YYYY-MM-DD.
        start: chrono::NaiveDate,

        /// Last day, YYYY-MM-DD.
        end: chrono::NaiveDate,
    },

    /// Company profiles from Finnhub.
    Profiles(Symbols),

    /// Key financial metrics from Finnhub.
    Financials(Symbols),
}

#[derive(clap::Args, Debug)]
pub struct Symbols {
    /// Stock symbols to import.
    ///
    /// If no symbols are provided, the constituents file is read.
    pub symbols: Vec<String>,

    /// CSV file with a `Symbol` column.
    #[arg(long, default_value = "data/constituents.csv")]
    pub constituents: PathBuf,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

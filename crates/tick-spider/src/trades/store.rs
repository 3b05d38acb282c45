use super::record::{Direction, TradeRecord, TradeTriple};
use super::sql;
use deadpool_postgres::Pool;
use std::future::Future;
use tracing::{debug, error, trace};

/// Number of trades listed when no limit is given.
pub const DEFAULT_LIMIT: i64 = 50;

/// Anything that can hand over the trades of a stock for aggregation.
pub trait TradeSource {
    /// Dated (date, direction, size) triples for every trade whose ticker contains `symbol`.
    fn fetch_triples(
        &self,
        symbol: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<TradeTriple>>> + Send;
}

/// `congress.trades`, through a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgTradeStore {
    pool: Pool,
}

impl PgTradeStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Every trade whose ticker contains `symbol`, most recent first.
    pub async fn trades_by_symbol(&self, symbol: &str) -> anyhow::Result<Vec<TradeRecord>> {
        let pattern = ticker_pattern(symbol)?;
        let pg_client = self.pool.get().await?;

        trace!("fetching trades matching {pattern} ...");
        let trades: Vec<TradeRecord> = pg_client
            .query(sql::SELECT_TRADES_BY_TICKER, &[&pattern])
            .await
            .map_err(|err| {
                error!("failed to fetch trades for {symbol}, error({err})");
                err
            })?
            .iter()
            .map(TradeRecord::from_row)
            .collect();
        debug!("{} trades found for {symbol}", trades.len());

        Ok(trades)
    }

    /// The `limit` most recent trades across all stocks.
    pub async fn recent_trades(&self, limit: i64) -> anyhow::Result<Vec<TradeRecord>> {
        let pg_client = self.pool.get().await?;

        trace!("fetching the {limit} most recent trades ...");
        let trades: Vec<TradeRecord> = pg_client
            .query(sql::SELECT_RECENT_TRADES, &[&limit])
            .await
            .map_err(|err| {
                error!("failed to fetch recent trades, error({err})");
                err
            })?
            .iter()
            .map(TradeRecord::from_row)
            .collect();

        Ok(trades)
    }
}

impl TradeSource for PgTradeStore {
    async fn fetch_triples(&self, symbol: &str) -> anyhow::Result<Vec<TradeTriple>> {
        let pattern = ticker_pattern(symbol)?;
        let pg_client = self.pool.get().await?;

        trace!("fetching trade triples matching {pattern} ...");
        let triples = pg_client
            .query(sql::SELECT_TRIPLES, &[&pattern])
            .await
            .map_err(|err| {
                error!("failed to fetch trade data for {symbol}, error({err})");
                err
            })?
            .iter()
            .map(|row| TradeTriple {
                traded: row.get(0),
                direction: Direction::from(row.get::<_, Option<String>>(1)),
                size: row.get::<_, Option<String>>(2).unwrap_or_default(),
            })
            .collect();

        Ok(triples)
    }
}

/// `ILIKE` pattern matching any ticker that contains `symbol`, e.g. `"aapl"` -> `"%AAPL%"`.
pub(crate) fn ticker_pattern(symbol: &str) -> anyhow::Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        anyhow::bail!("stock symbol is required");
    }
    Ok(format!("%{symbol}%"))
}

mod sql;

/// Company profiles, real-time quotes and basic financials from the [Finnhub] API.
///
/// [Finnhub]: https://finnhub.io/docs/api
pub mod finnhub;

/// Key financial metrics extracted from Finnhub's basic financials.
pub mod metrics;

/// Company profile imports, and searching the imported symbols.
pub mod symbols;

/// Daily end-of-day prices from the [Tiingo] API.
///
/// [Tiingo]: https://www.tiingo.com/documentation/end-of-day
pub mod tiingo;

/// The S&P 500 constituents list, used as the default set of symbols to import.
pub mod constituents;

use crate::http::PgClient;

/// Primary key of `symbol` in `stock.symbols`, if it has been imported.
pub(crate) async fn symbol_pk(pg_client: &PgClient, symbol: &str) -> anyhow::Result<Option<i32>> {
    let row = pg_client.query_opt(sql::SELECT_SYMBOL_PK, &[&symbol]).await?;
    Ok(row.map(|row| row.get(0)))
}

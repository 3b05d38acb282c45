use super::finnhub::{Finnhub, Profile};
use super::sql;
use crate::api::{self, THROTTLE};
use crate::http::PgClient;
use chrono::NaiveDate;
use deadpool_postgres::Pool;
use serde::Serialize;
use tracing::{debug, error, info, trace, warn};

/// Number of matches returned by [`search`].
pub const SEARCH_LIMIT: i64 = 10;

/// A symbol match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub symbol: String,
    pub name: String,
}

/// Symbols, or company names, starting with `query` (case-insensitive).
pub async fn search(pool: &Pool, query: &str, limit: i64) -> anyhow::Result<Vec<Listing>> {
    let query = query.trim().to_uppercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let pg_client = pool.get().await?;
    let pattern = format!("{query}%");
    trace!("searching stock.symbols for {pattern}");
    let listings = pg_client
        .query(sql::SEARCH_SYMBOLS, &[&pattern, &limit])
        .await
        .map_err(|err| {
            error!("failed to search stock.symbols, error({err})");
            err
        })?
        .into_iter()
        .map(|row| Listing {
            symbol: row.get(0),
            name: row.get(1),
        })
        .collect();

    Ok(listings)
}

/// Fetch the Finnhub profile of each of `symbols` and upsert it into `stock.symbols`.
///
/// Returns the number of profiles stored.
pub async fn import_profiles(
    pool: &Pool,
    finnhub: &Finnhub,
    symbols: &[String],
    tui: bool,
) -> anyhow::Result<usize> {
    let time = std::time::Instant::now();
    let pg_client = pool.get().await?;

    let pb = crate::tui::progress_bar(symbols.len(), "profiles", tui)?;
    let mut processed = 0;
    for symbol in symbols {
        let symbol = symbol.trim().to_uppercase();
        pb.inc(1);

        let profile = match api::retry_rate_limited(&symbol, || finnhub.profile(&symbol)).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!("no profile data for {symbol}");
                continue;
            }
            Err(err) => {
                warn!("API error for {symbol}, skipping, error({err})");
                continue;
            }
        };
        tokio::time::sleep(THROTTLE).await;

        match upsert(&pg_client, &symbol, &profile).await {
            Ok(_) => {
                debug!("profile stored for {symbol}");
                processed += 1;
            }
            Err(err) => error!("failed to store profile for {symbol}, error({err})"),
        }
    }
    pb.finish_and_clear();

    info!(
        "profiles imported for {processed}/{} symbols. {}",
        symbols.len(),
        crate::time_elapsed(time)
    );
    Ok(processed)
}

async fn upsert(pg_client: &PgClient, symbol: &str, profile: &Profile) -> anyhow::Result<u64> {
    // Finnhub's own ticker wins over the one we asked for
    let symbol = profile.ticker.as_deref().unwrap_or(symbol);
    let ipo = profile
        .ipo
        .as_deref()
        .and_then(|ipo| NaiveDate::parse_from_str(ipo, "%Y-%m-%d").ok());

    let rows = pg_client
        .execute(
            sql::UPSERT_PROFILE,
            &[
                &symbol,
                &profile.name,
                &profile.exchange,
                &profile.industry,
                &profile.currency,
                &profile.country,
                &profile.estimate_currency,
                &ipo,
                &profile.logo,
                &profile.market_cap,
                &profile.phone,
                &profile.shares_outstanding,
                &profile.weburl,
            ],
        )
        .await?;
    Ok(rows)
}

use super::record::{parse_trade_date, Direction, TradeRecord};
use super::sql;
use crate::http::PgClient;
use deadpool_postgres::Pool;
use futures::future::try_join_all;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

/// Trades sent to the database per batch.
pub const DEFAULT_CHUNK_SIZE: usize = 5_000;

/// One trade as written by the scraper; every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapedTrade {
    pub politician_name: Option<String>,
    pub politician_family: Option<String>,
    pub politician_link: Option<String>,
    pub traded_issuer_name: Option<String>,
    pub traded_issuer_ticker: Option<String>,
    pub traded_issuer_link: Option<String>,
    pub published: Option<String>,

    /// e.g. `"3 Apr 2025"`
    pub traded: Option<String>,
    pub filed_after: Option<String>,
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<String>,
    pub price: Option<String>,
}

/// Tally of an import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Records read from the file.
    pub records: usize,

    /// Records written to the database.
    pub inserted: usize,

    /// Records missing a politician or issuer name.
    pub rejected: usize,

    pub dates_parsed: usize,
    pub dates_failed: usize,
    pub dates_missing: usize,
}

/// Convert scraped trades into records, tallying trade dates along the way.
///
/// Records without a politician or issuer name cannot be stored and are rejected; records whose
/// trade date is missing or unparsable are kept without one.
pub fn prepare(scraped: Vec<ScrapedTrade>) -> (Vec<TradeRecord>, ImportReport) {
    let mut report = ImportReport {
        records: scraped.len(),
        ..Default::default()
    };

    let mut records = Vec::with_capacity(scraped.len());
    for (i, trade) in scraped.into_iter().enumerate() {
        let traded = match trade.traded.as_deref().map(str::trim) {
            None | Some("") => {
                report.dates_missing += 1;
                None
            }
            Some(raw) => {
                let date = parse_trade_date(raw);
                match date {
                    Some(_) => report.dates_parsed += 1,
                    None => report.dates_failed += 1,
                }
                date
            }
        };

        let (Some(politician_name), Some(traded_issuer_name)) =
            (trade.politician_name, trade.traded_issuer_name)
        else {
            warn!("rejecting record #{i}: missing politician or issuer name");
            report.rejected += 1;
            continue;
        };

        records.push(TradeRecord {
            politician_name,
            politician_family: trade.politician_family,
            politician_link: trade.politician_link,
            traded_issuer_name,
            traded_issuer_ticker: trade.traded_issuer_ticker,
            traded_issuer_link: trade.traded_issuer_link,
            published: trade.published,
            traded,
            filed_after: trade.filed_after,
            owner: trade.owner,
            direction: Direction::from(trade.kind),
            size: trade.size,
            price: trade.price,
        });
    }

    (records, report)
}

/// Replace the contents of `congress.trades` with the trades scraped to `path`.
///
/// The table is cleared and refilled, `chunk_size` records at a time, inside a single
/// transaction: if any insert fails, the previous contents are left untouched.
pub async fn import_file(
    pool: &Pool,
    path: impl AsRef<Path>,
    chunk_size: usize,
    tui: bool,
) -> anyhow::Result<ImportReport> {
    let time = std::time::Instant::now();
    let path = path.as_ref();

    info!("reading scraped trades from {} ...", path.display());
    let scraped: Vec<ScrapedTrade> = crate::fs::read_json(path).await?;

    info!("processing {} trades ...", scraped.len());
    let (records, mut report) = prepare(scraped);
    info!("successfully parsed {} dates", report.dates_parsed);
    if report.dates_failed > 0 {
        warn!("failed to parse {} dates", report.dates_failed);
    }

    let mut pg_client = pool.get().await?;
    report.inserted = replace_all(&mut pg_client, &records, chunk_size, tui).await?;

    info!(
        "{} trades loaded from {}. {}",
        report.inserted,
        path.display(),
        crate::time_elapsed(time)
    );
    Ok(report)
}

async fn replace_all(
    pg_client: &mut PgClient,
    records: &[TradeRecord],
    chunk_size: usize,
    tui: bool,
) -> anyhow::Result<usize> {
    let query = pg_client.prepare(sql::INSERT_TRADE).await?;
    let transaction = pg_client.transaction().await?;

    debug!("clearing existing trade data ...");
    transaction
        .execute(sql::DELETE_TRADES, &[])
        .await
        .map_err(|err| {
            error!("failed to clear congress.trades, error({err})");
            err
        })?;

    let pb = crate::tui::progress_bar(records.len(), "trades", tui)?;
    for (i, chunk) in records.chunks(chunk_size.max(1)).enumerate() {
        // pipelined: the chunk's inserts are in flight together
        try_join_all(chunk.iter().map(|trade| {
            let transaction = &transaction;
            let query = &query;
            async move {
                let kind = trade.direction.as_str();
                transaction
                    .execute(
                        query,
                        &[
                            &trade.politician_name,
                            &trade.politician_family,
                            &trade.politician_link,
                            &trade.traded_issuer_name,
                            &trade.traded_issuer_ticker,
                            &trade.traded_issuer_link,
                            &trade.published,
                            &trade.traded,
                            &trade.filed_after,
                            &trade.owner,
                            &kind,
                            &trade.size,
                            &trade.price,
                        ],
                    )
                    .await
            }
        }))
        .await
        .map_err(|err| {
            error!("failed to insert trade chunk {}, error({err})", i + 1);
            err
        })?;

        pb.inc(chunk.len() as u64);
        trace!("chunk {} inserted ({} trades)", i + 1, chunk.len());
    }
    pb.finish_and_clear();

    // dropping an uncommitted transaction rolls it back
    transaction.commit().await.map_err(|err| {
        error!("failed to commit trade data, changes rolled back, error({err})");
        err
    })?;

    Ok(records.len())
}

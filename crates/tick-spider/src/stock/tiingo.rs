use super::sql;
use crate::api::{self, ApiError};
use crate::http::*;
use chrono::NaiveDate;
use deadpool_postgres::Pool;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info, trace};

const TIINGO_URL: &str = "https://api.tiingo.com/tiingo/daily";

// client
// ----------------------------------------------------------------------------

pub struct Tiingo {
    http_client: HttpClient,
    token: String,
}

impl Tiingo {
    pub fn new(http_client: HttpClient, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
        }
    }

    /// Client authenticated with `TIINGO_API_KEY`.
    pub fn from_env() -> anyhow::Result<Self> {
        let token = api::api_key("TIINGO_API_KEY")?;
        Ok(Self::new(crate::std_client_build()?, token))
    }

    /// Daily prices of `symbol` between `start` and `end`, inclusive.
    pub async fn daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyPrice>, ApiError> {
        let url = format!("{TIINGO_URL}/{symbol}/prices");
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();

        trace!("fetching Tiingo daily prices for {symbol}, {start} to {end}");
        let request = self
            .http_client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
            .query(&[
                ("startDate", start.as_str()),
                ("endDate", end.as_str()),
                ("resampleFreq", "daily"),
                ("format", "json"),
            ]);
        api::get_json(request).await
    }
}

// import
// ----------------------------------------------------------------------------

/// Fetch the daily prices of `symbol` between `start` and `end`, and insert them into
/// `stock.prices`. The symbol must already exist in `stock.symbols`.
///
/// Returns the number of days stored; days already in the table are left as they are.
pub async fn import_daily_prices(
    pool: &Pool,
    tiingo: &Tiingo,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<usize> {
    let symbol = symbol.trim().to_uppercase();
    if start > end {
        anyhow::bail!("start date {start} is after end date {end}");
    }

    let prices = tiingo
        .daily_prices(&symbol, start, end)
        .await
        .map_err(|err| {
            error!("failed to fetch Tiingo prices for {symbol}, error({err})");
            err
        })?;

    let mut pg_client = pool.get().await?;
    let Some(symbol_pk) = super::symbol_pk(&pg_client, &symbol).await? else {
        anyhow::bail!("no stock found for symbol {symbol}");
    };

    let inserted = Prices(prices).insert(&mut pg_client, symbol_pk, &symbol).await?;
    info!("imported {inserted} daily prices for {symbol}");

    Ok(inserted as usize)
}

// de
// ----------------------------------------------------------------------------

/// One day of prices.
///
/// ```json
/// {
///     "date": "2024-12-31T00:00:00.000Z",
///     "close": 250.42,
///     "high": 253.28,
///     "low": 249.43,
///     "open": 252.44,
///     "volume": 39480718,
///     "adjClose": 250.1452961825,
///     "adjHigh": 253.0021588416,
///     "adjLow": 249.1563821852,
///     "adjOpen": 252.1630802984,
///     "adjVolume": 39480718,
///     "divCash": 0.0,
///     "splitFactor": 1.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrice {
    #[serde(deserialize_with = "de_day")]
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub adj_open: Option<f64>,
    pub adj_high: Option<f64>,
    pub adj_low: Option<f64>,
    pub adj_close: Option<f64>,
    pub adj_volume: Option<f64>,
}

// `2024-12-31T00:00:00.000Z` -> 2024-12-31
fn de_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

#[derive(Debug)]
struct Prices(Vec<DailyPrice>);

impl Prices {
    async fn insert(
        &self,
        pg_client: &mut PgClient,
        symbol_pk: i32,
        symbol: &str,
    ) -> anyhow::Result<u64> {
        let time = std::time::Instant::now();

        // preprocess pg query as transaction
        let query = pg_client.prepare(sql::INSERT_PRICE).await?;
        let transaction = pg_client.transaction().await?;

        // days already stored are skipped by the insert, and not counted
        let mut inserted = 0;
        for cell in &self.0 {
            inserted += transaction
                .execute(
                    &query,
                    &[
                        &symbol_pk,
                        &cell.date,
                        &cell.open,
                        &cell.high,
                        &cell.low,
                        &cell.close,
                        &cell.volume,
                        &cell.adj_open,
                        &cell.adj_high,
                        &cell.adj_low,
                        &cell.adj_close,
                        &cell.adj_volume,
                    ],
                )
                .await
                .map_err(|err| {
                    error!("failed to insert price row for {symbol} on {}, error({err})", cell.date);
                    err
                })?;
        }

        transaction.commit().await.map_err(|err| {
            error!("failed to commit transaction for Tiingo prices, for {symbol}, error({err})");
            err
        })?;

        debug!(
            "{symbol} priceset inserted, {inserted} new of {}. {}",
            self.0.len(),
            crate::time_elapsed(time)
        );
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_price_rows() {
        let json = r#"[{
            "date": "2024-12-31T00:00:00.000Z",
            "close": 250.42,
            "high": 253.28,
            "low": 249.43,
            "open": 252.44,
            "volume": 39480718,
            "adjClose": 250.1452961825,
            "adjHigh": 253.0021588416,
            "adjLow": 249.1563821852,
            "adjOpen": 252.1630802984,
            "adjVolume": 39480718,
            "divCash": 0.0,
            "splitFactor": 1.0
        }]"#;

        let prices: Vec<DailyPrice> = serde_json::from_str(json).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(prices[0].close, Some(250.42));
        assert_eq!(prices[0].volume, Some(39_480_718));
        assert_eq!(prices[0].adj_volume, Some(39_480_718.0));
    }

    #[test]
    fn plain_dates_are_accepted() {
        let price: DailyPrice = serde_json::from_str(r#"{"date": "2024-06-05"}"#).unwrap();
        assert_eq!(price.date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(price.open, None);
    }

    #[test]
    fn bad_dates_are_rejected() {
        let result: Result<DailyPrice, _> = serde_json::from_str(r#"{"date": "yesterday"}"#);
        assert!(result.is_err());
    }
}

use super::finnhub::Finnhub;
use super::sql;
use crate::api::{self, THROTTLE};
use chrono::NaiveDate;
use deadpool_postgres::Pool;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Finnhub's basic financials response; only the `metric` object is kept.
#[derive(Debug, Default, Deserialize)]
pub struct BasicFinancials {
    pub metric: Option<KeyMetrics>,
}

/// The subset of Finnhub metrics stored in `stock.metrics`. Metrics Finnhub does not report for
/// a company are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KeyMetrics {
    #[serde(rename(deserialize = "10DayAverageTradingVolume"))]
    pub ten_day_avg_volume: Option<f64>,
    #[serde(rename(deserialize = "13WeekPriceReturnDaily"))]
    pub thirteen_week_return: Option<f64>,
    #[serde(rename(deserialize = "52WeekHigh"))]
    pub fifty_two_wk_high: Option<f64>,
    #[serde(rename(deserialize = "52WeekHighDate"))]
    pub fifty_two_wk_high_date: Option<NaiveDate>,
    #[serde(rename(deserialize = "52WeekLow"))]
    pub fifty_two_wk_low: Option<f64>,
    #[serde(rename(deserialize = "52WeekLowDate"))]
    pub fifty_two_wk_low_date: Option<NaiveDate>,
    pub beta: Option<f64>,
    #[serde(rename(deserialize = "peTTM"))]
    pub pe_ttm: Option<f64>,
    pub pb: Option<f64>,
    #[serde(rename(deserialize = "psTTM"))]
    pub ps_ttm: Option<f64>,
    #[serde(rename(deserialize = "currentDividendYieldTTM"))]
    pub dividend_yield_ttm: Option<f64>,
    #[serde(rename(deserialize = "currentRatioQuarterly"))]
    pub current_ratio_quarterly: Option<f64>,
    #[serde(rename(deserialize = "quickRatioQuarterly"))]
    pub quick_ratio_quarterly: Option<f64>,
    #[serde(rename(deserialize = "roeTTM"))]
    pub roe_ttm: Option<f64>,
    #[serde(rename(deserialize = "roaTTM"))]
    pub roa_ttm: Option<f64>,
    #[serde(rename(deserialize = "epsTTM"))]
    pub eps_ttm: Option<f64>,
    #[serde(rename(deserialize = "revenuePerShareTTM"))]
    pub rev_per_share_ttm: Option<f64>,
    #[serde(rename(deserialize = "revenueGrowthTTMYoy"))]
    pub rev_growth_ttm_yoy: Option<f64>,
    #[serde(rename(deserialize = "epsGrowthTTMYoy"))]
    pub eps_growth_ttm_yoy: Option<f64>,
}

/// Fetch key metrics for each of `symbols` and store a snapshot dated today.
///
/// Symbols that are not in `stock.symbols`, or that Finnhub reports no metrics for, are
/// skipped. Returns the number of symbols stored.
pub async fn import_financials(
    pool: &Pool,
    finnhub: &Finnhub,
    symbols: &[String],
    tui: bool,
) -> anyhow::Result<usize> {
    let time = std::time::Instant::now();
    let pg_client = pool.get().await?;
    let query = pg_client.prepare(sql::INSERT_METRICS).await?;
    let dated = chrono::Utc::now().date_naive();

    let pb = crate::tui::progress_bar(symbols.len(), "financials", tui)?;
    let mut processed = 0;
    for symbol in symbols {
        let symbol = symbol.trim().to_uppercase();
        pb.inc(1);

        let response =
            match api::retry_rate_limited(&symbol, || finnhub.basic_financials(&symbol)).await {
                Ok(response) => response,
                Err(err) => {
                    warn!("API error for {symbol}, skipping, error({err})");
                    continue;
                }
            };
        tokio::time::sleep(THROTTLE).await;

        let Some(m) = response.metric else {
            warn!("no financial data for {symbol}, skipping");
            continue;
        };

        let Some(symbol_pk) = super::symbol_pk(&pg_client, &symbol).await? else {
            warn!("stock {symbol} not in stock.symbols, skipping");
            continue;
        };

        let result = pg_client
            .execute(
                &query,
                &[
                    &symbol_pk,
                    &dated,
                    &m.ten_day_avg_volume,
                    &m.thirteen_week_return,
                    &m.fifty_two_wk_high,
                    &m.fifty_two_wk_high_date,
                    &m.fifty_two_wk_low,
                    &m.fifty_two_wk_low_date,
                    &m.beta,
                    &m.pe_ttm,
                    &m.pb,
                    &m.ps_ttm,
                    &m.dividend_yield_ttm,
                    &m.current_ratio_quarterly,
                    &m.quick_ratio_quarterly,
                    &m.roe_ttm,
                    &m.roa_ttm,
                    &m.eps_ttm,
                    &m.rev_per_share_ttm,
                    &m.rev_growth_ttm_yoy,
                    &m.eps_growth_ttm_yoy,
                ],
            )
            .await;
        match result {
            Ok(_) => {
                debug!("key metrics inserted for {symbol}");
                processed += 1;
            }
            Err(err) => error!("failed to insert key metrics for {symbol}, error({err})"),
        }
    }
    pb.finish_and_clear();

    info!(
        "key metrics imported for {processed}/{} symbols. {}",
        symbols.len(),
        crate::time_elapsed(time)
    );
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_stored_metrics() {
        let json = r#"{
            "metric": {
                "10DayAverageTradingVolume": 43.8,
                "13WeekPriceReturnDaily": 5.21,
                "52WeekHigh": 260.1,
                "52WeekHighDate": "2024-12-26",
                "52WeekLow": 164.08,
                "52WeekLowDate": "2024-04-19",
                "beta": 1.24,
                "peTTM": 40.1,
                "pb": 60.2,
                "psTTM": 9.8,
                "currentDividendYieldTTM": 0.41,
                "currentRatioQuarterly": 0.87,
                "quickRatioQuarterly": 0.83,
                "roeTTM": 157.4,
                "roaTTM": 25.7,
                "epsTTM": 6.08,
                "revenuePerShareTTM": 25.5,
                "revenueGrowthTTMYoy": 2.02,
                "epsGrowthTTMYoy": -0.34,
                "bookValuePerShareAnnual": 3.77,
                "marketCapitalization": 3700000
            },
            "metricType": "all",
            "series": {},
            "symbol": "AAPL"
        }"#;

        let response: BasicFinancials = serde_json::from_str(json).unwrap();
        let metrics = response.metric.unwrap();
        assert_eq!(metrics.ten_day_avg_volume, Some(43.8));
        assert_eq!(
            metrics.fifty_two_wk_high_date,
            NaiveDate::from_ymd_opt(2024, 12, 26)
        );
        assert_eq!(metrics.pe_ttm, Some(40.1));
        assert_eq!(metrics.eps_growth_ttm_yoy, Some(-0.34));
    }

    #[test]
    fn missing_metrics_are_none() {
        let response: BasicFinancials =
            serde_json::from_str(r#"{"metric": {"beta": 0.9, "peTTM": null}}"#).unwrap();
        let metrics = response.metric.unwrap();
        assert_eq!(metrics.beta, Some(0.9));
        assert_eq!(metrics.pe_ttm, None);
        assert_eq!(metrics.fifty_two_wk_low_date, None);
    }

    #[test]
    fn unknown_symbol_has_no_metric_object() {
        let response: BasicFinancials = serde_json::from_str("{}").unwrap();
        assert!(response.metric.is_none());
    }
}

//! Monthly buy/sell volume, for charting.

use super::record::{Direction, TradeTriple};
use super::size::size_to_numeric;
use super::store::TradeSource;
use chrono::Datelike;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use tracing::debug;

/// Estimated trade volume for one calendar month.
///
/// ```json
/// {
///     "year": 2024,
///     "month": 3,
///     "month_label": "2024-03",
///     "buy_total": 8000.0,
///     "sell_total": 750000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    pub buy_total: f64,
    pub sell_total: f64,
}

impl MonthlyBucket {
    fn new(year: i32, month: u32, totals: Totals) -> Self {
        Self {
            year,
            month,
            month_label: format!("{year}-{month:02}"),
            buy_total: totals.buy,
            sell_total: totals.sell,
        }
    }
}

/// Result of an aggregation: the months in ascending order, and how many triples were dropped
/// for lacking a trade date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub months: Vec<MonthlyBucket>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    buy: f64,
    sell: f64,
}

/// Sum estimated buy and sell volume per (year, month).
///
/// Triples without a date are skipped. A month with trades in neither direction still gets a
/// bucket, with both totals at zero.
pub fn aggregate<I>(triples: I) -> Summary
where
    I: IntoIterator,
    I::Item: Borrow<TradeTriple>,
{
    let mut months: BTreeMap<(i32, u32), Totals> = BTreeMap::new();
    let mut skipped = 0;

    for triple in triples {
        let triple = triple.borrow();
        let Some(traded) = triple.traded else {
            skipped += 1;
            continue;
        };

        let estimate = size_to_numeric(&triple.size);
        let totals = months.entry((traded.year(), traded.month())).or_default();
        match triple.direction {
            Direction::Buy => totals.buy += estimate,
            Direction::Sell => totals.sell += estimate,
            Direction::Unknown => {}
        }
    }

    Summary {
        months: months
            .into_iter()
            .map(|((year, month), totals)| MonthlyBucket::new(year, month, totals))
            .collect(),
        skipped,
    }
}

/// Fetch every trade of `symbol` from `source` and aggregate it by month.
pub async fn monthly_summary<S: TradeSource>(source: &S, symbol: &str) -> anyhow::Result<Summary> {
    let time = std::time::Instant::now();
    let triples = source.fetch_triples(symbol).await?;
    let summary = aggregate(&triples);

    if summary.skipped > 0 {
        debug!(
            "[{symbol}] skipped {} of {} trades without a valid date",
            summary.skipped,
            triples.len()
        );
    }
    debug!(
        "[{symbol}] monthly summary built over {} months. {}",
        summary.months.len(),
        crate::time_elapsed(time)
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input() {
        let summary = aggregate(Vec::<TradeTriple>::new());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn buckets_by_month() {
        let triples = vec![
            TradeTriple::new(date(2024, 3, 1), Direction::Buy, "1K-15K"),
            TradeTriple::new(date(2024, 3, 15), Direction::Sell, "500K-1M"),
            TradeTriple::new(date(2024, 4, 1), Direction::Buy, "100K"),
        ];

        let summary = aggregate(&triples);
        assert_eq!(summary.skipped, 0);
        assert_eq!(
            summary.months,
            vec![
                MonthlyBucket {
                    year: 2024,
                    month: 3,
                    month_label: "2024-03".to_string(),
                    buy_total: 8_000.0,
                    sell_total: 750_000.0,
                },
                MonthlyBucket {
                    year: 2024,
                    month: 4,
                    month_label: "2024-04".to_string(),
                    buy_total: 100_000.0,
                    sell_total: 0.0,
                },
            ]
        );
    }

    #[test]
    fn order_of_input_is_irrelevant() {
        let mut triples = vec![
            TradeTriple::new(date(2023, 12, 31), Direction::Buy, "1K-15K"),
            TradeTriple::new(date(2024, 1, 2), Direction::Sell, "< 1K"),
            TradeTriple::new(date(2022, 6, 9), Direction::Buy, "> 50M"),
            TradeTriple::new(date(2023, 12, 1), Direction::Buy, "15K-50K"),
        ];
        let forward = aggregate(&triples);
        triples.reverse();
        let backward = aggregate(&triples);

        assert_eq!(forward, backward);
        let labels: Vec<&str> = forward.months.iter().map(|m| m.month_label.as_str()).collect();
        assert_eq!(labels, ["2022-06", "2023-12", "2024-01"]);
        assert_eq!(forward.months[1].buy_total, 8_000.0 + 32_500.0);
        assert_eq!(forward.months[2].sell_total, 500.0);
    }

    #[test]
    fn undated_triples_are_skipped() {
        let triples = vec![
            TradeTriple::from_raw("not a date", "buy", "1K-15K"),
            TradeTriple::from_raw("", "sell", "1K-15K"),
            TradeTriple::new(date(2024, 5, 20), Direction::Buy, "1K-15K"),
        ];

        let summary = aggregate(&triples);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].buy_total, 8_000.0);
        assert_eq!(summary.months[0].sell_total, 0.0);
    }

    #[test]
    fn unknown_direction_adds_nothing() {
        let triples = vec![
            TradeTriple::from_raw("2024-05-01", "unknown", "1M-5M"),
            TradeTriple::from_raw("2024-05-02", "exchange", "1M-5M"),
            TradeTriple::from_raw("2024-05-03", "BUY", "< 1K"),
        ];

        let summary = aggregate(&triples);
        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].buy_total, 500.0);
        assert_eq!(summary.months[0].sell_total, 0.0);
    }

    #[test]
    fn month_with_only_unknown_trades_is_zeroed() {
        let triples = vec![TradeTriple::from_raw("2024-07-04", "unknown", "1K-15K")];

        let summary = aggregate(triples);
        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].month_label, "2024-07");
        assert_eq!(summary.months[0].buy_total, 0.0);
        assert_eq!(summary.months[0].sell_total, 0.0);
    }

    #[test]
    fn unparsable_sizes_count_as_zero() {
        let triples = vec![
            TradeTriple::from_raw("2024-08-01", "buy", "N/A"),
            TradeTriple::from_raw("2024-08-02", "buy", "garbage"),
            TradeTriple::from_raw("2024-08-03", "buy", "100K"),
        ];

        let summary = aggregate(&triples);
        assert_eq!(summary.months[0].buy_total, 100_000.0);
    }

    #[test]
    fn serializes_wire_format() {
        let summary = aggregate(vec![TradeTriple::new(date(2024, 3, 1), Direction::Buy, "1K-15K")]);
        let json = serde_json::to_value(&summary.months).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "year": 2024,
                    "month": 3,
                    "month_label": "2024-03",
                    "buy_total": 8000.0,
                    "sell_total": 0.0
                }
            ])
        );
    }
}

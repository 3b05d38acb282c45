use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tracing::warn;

/// Direction of a disclosed trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Direction {
    /// An acquisition.
    Buy,

    /// A disposal.
    Sell,

    /// Anything else the filing reports (exchanges, missing labels, ...).
    #[default]
    Unknown,
}

impl Direction {
    /// Classify a label, ignoring case and surrounding whitespace.
    ///
    /// ```rust
    /// use tick_spider::trades::Direction;
    ///
    /// assert_eq!(Direction::from_label(" BUY "), Direction::Buy);
    /// assert_eq!(Direction::from_label("exchange"), Direction::Unknown);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("buy") {
            Direction::Buy
        } else if label.eq_ignore_ascii_case("sell") {
            Direction::Sell
        } else {
            Direction::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
            Direction::Unknown => "unknown",
        }
    }
}

impl From<&str> for Direction {
    fn from(label: &str) -> Self {
        Direction::from_label(label)
    }
}

impl From<Option<String>> for Direction {
    fn from(label: Option<String>) -> Self {
        label.as_deref().map(Direction::from_label).unwrap_or_default()
    }
}

/// Parse the date of a disclosure.
///
/// Scraped dates look like `"3 Apr 2025"`, with September sometimes abbreviated to `"Sept"`;
/// ISO dates (`"2025-04-03"`) are accepted too. Returns `None` for empty or unparsable input.
pub fn parse_trade_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    let normalised = raw
        .split_whitespace()
        .map(|word| if word == "Sept" { "Sep" } else { word })
        .collect::<Vec<_>>()
        .join(" ");
    match NaiveDate::parse_from_str(&normalised, "%d %b %Y") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!("could not parse date string \"{raw}\" (processed as \"{normalised}\"), error({err})");
            None
        }
    }
}

/// A congressional trade disclosure, as stored in `congress.trades`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub politician_name: String,

    /// Party, chamber and state, e.g. `"Republican House TX"`.
    pub politician_family: Option<String>,
    pub politician_link: Option<String>,
    pub traded_issuer_name: String,

    /// Ticker as disclosed, e.g. `"MSFT:US"`.
    pub traded_issuer_ticker: Option<String>,
    pub traded_issuer_link: Option<String>,
    pub published: Option<String>,
    pub traded: Option<NaiveDate>,

    /// Gap between trading and filing, e.g. `"days 12"`.
    pub filed_after: Option<String>,
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub direction: Direction,

    /// Size band, e.g. `"1K–15K"`.
    pub size: Option<String>,

    /// Price string, e.g. `"$153.18"` or `"N/A"`.
    pub price: Option<String>,
}

impl TradeRecord {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            politician_name: row.get("politician_name"),
            politician_family: row.get("politician_family"),
            politician_link: row.get("politician_link"),
            traded_issuer_name: row.get("traded_issuer_name"),
            traded_issuer_ticker: row.get("traded_issuer_ticker"),
            traded_issuer_link: row.get("traded_issuer_link"),
            published: row.get("published"),
            traded: row.get("traded"),
            filed_after: row.get("filed_after"),
            owner: row.get("owner"),
            direction: Direction::from(row.get::<_, Option<String>>("type")),
            size: row.get("size"),
            price: row.get("price"),
        }
    }

    /// The (date, direction, size) view used for aggregation.
    pub fn triple(&self) -> TradeTriple {
        TradeTriple {
            traded: self.traded,
            direction: self.direction,
            size: self.size.clone().unwrap_or_default(),
        }
    }
}

/// One row of input to the monthly aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeTriple {
    pub traded: Option<NaiveDate>,
    pub direction: Direction,
    pub size: String,
}

impl TradeTriple {
    pub fn new(traded: NaiveDate, direction: Direction, size: impl Into<String>) -> Self {
        Self {
            traded: Some(traded),
            direction,
            size: size.into(),
        }
    }

    /// Build a triple from raw strings; an unparsable date leaves `traded` empty.
    pub fn from_raw(traded: &str, direction: &str, size: &str) -> Self {
        Self {
            traded: parse_trade_date(traded),
            direction: Direction::from_label(direction),
            size: size.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn directions() {
        assert_eq!(Direction::from_label("buy"), Direction::Buy);
        assert_eq!(Direction::from_label("Sell"), Direction::Sell);
        assert_eq!(Direction::from_label("SELL\n"), Direction::Sell);
        assert_eq!(Direction::from_label("Tradetype is none"), Direction::Unknown);
        assert_eq!(Direction::from_label(""), Direction::Unknown);
        assert_eq!(Direction::from(None::<String>), Direction::Unknown);
    }

    #[test]
    fn direction_serde() {
        assert_eq!(serde_json::to_string(&Direction::Buy).unwrap(), r#""buy""#);
        assert_eq!(serde_json::to_string(&Direction::Unknown).unwrap(), r#""unknown""#);

        let de: Direction = serde_json::from_str(r#""Sell""#).unwrap();
        assert_eq!(de, Direction::Sell);
        let de: Direction = serde_json::from_str("null").unwrap();
        assert_eq!(de, Direction::Unknown);
        let de: Direction = serde_json::from_str(r#""exchange""#).unwrap();
        assert_eq!(de, Direction::Unknown);
    }

    #[test]
    fn scraped_dates() {
        assert_eq!(parse_trade_date("3 Apr 2025"), Some(date(2025, 4, 3)));
        assert_eq!(parse_trade_date("3 Sept 2024"), Some(date(2024, 9, 3)));
        assert_eq!(parse_trade_date("23 Sep 2024"), Some(date(2024, 9, 23)));
        assert_eq!(parse_trade_date(" 11 Dec 2023 "), Some(date(2023, 12, 11)));
        assert_eq!(parse_trade_date("2024-03-15"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn bad_dates() {
        assert_eq!(parse_trade_date(""), None);
        assert_eq!(parse_trade_date("yesterday"), None);
        assert_eq!(parse_trade_date("31 Feb 2024"), None);
        assert_eq!(parse_trade_date("2024-13-01"), None);
    }

    #[test]
    fn raw_triples() {
        let triple = TradeTriple::from_raw("3 Apr 2025", "BUY", "1K–15K");
        assert_eq!(triple, TradeTriple::new(date(2025, 4, 3), Direction::Buy, "1K–15K"));

        let triple = TradeTriple::from_raw("not a date", "sell", "100K");
        assert_eq!(triple.traded, None);
        assert_eq!(triple.direction, Direction::Sell);
    }

    #[test]
    fn record_serializes_type_and_iso_date() {
        let record = TradeRecord {
            politician_name: "Jane Doe".to_string(),
            politician_family: Some("Democrat House CA".to_string()),
            politician_link: None,
            traded_issuer_name: "Apple Inc".to_string(),
            traded_issuer_ticker: Some("AAPL:US".to_string()),
            traded_issuer_link: None,
            published: Some("5 Apr 2025".to_string()),
            traded: Some(date(2025, 4, 3)),
            filed_after: Some("days 2".to_string()),
            owner: Some("Spouse".to_string()),
            direction: Direction::Buy,
            size: Some("1K–15K".to_string()),
            price: Some("N/A".to_string()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "buy");
        assert_eq!(json["traded"], "2025-04-03");
        assert_eq!(json["politician_link"], serde_json::Value::Null);

        let triple = record.triple();
        assert_eq!(triple.size, "1K–15K");
        assert_eq!(triple.traded, Some(date(2025, 4, 3)));
    }
}

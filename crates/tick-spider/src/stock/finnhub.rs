use super::metrics::BasicFinancials;
use crate::api::{self, ApiError};
use crate::http::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

const FINNHUB_URL: &str = "https://finnhub.io/api/v1";

// client
// ----------------------------------------------------------------------------

pub struct Finnhub {
    http_client: HttpClient,
    token: String,
}

impl Finnhub {
    pub fn new(http_client: HttpClient, token: impl Into<String>) -> Self {
        Self {
            http_client,
            token: token.into(),
        }
    }

    /// Client authenticated with `FINNHUB_API_KEY`.
    pub fn from_env() -> anyhow::Result<Self> {
        let token = api::api_key("FINNHUB_API_KEY")?;
        Ok(Self::new(crate::std_client_build()?, token))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        trace!("GET finnhub {path} {query:?}");
        let request = self
            .http_client
            .get(format!("{FINNHUB_URL}{path}"))
            .query(query)
            .query(&[("token", self.token.as_str())]);
        api::get_json(request).await
    }

    /// Company profile of `symbol`; `None` if Finnhub does not know the company.
    ///
    /// Market capitalisation and shares outstanding change daily, so profiles are worth
    /// refreshing once a day.
    pub async fn profile(&self, symbol: &str) -> Result<Option<Profile>, ApiError> {
        let profile: Profile = self.get("/stock/profile2", &[("symbol", symbol)]).await?;

        // unknown symbols come back as an empty object
        Ok(profile.name.is_some().then_some(profile))
    }

    /// Current quote of `symbol`.
    pub async fn quote(&self, symbol: &str) -> Result<Quote, ApiError> {
        self.get("/quote", &[("symbol", symbol)]).await
    }

    /// Key ratios, balance sheet figures, income and cash flow data of `symbol`.
    pub async fn basic_financials(&self, symbol: &str) -> Result<BasicFinancials, ApiError> {
        self.get("/stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await
    }
}

// de
// ----------------------------------------------------------------------------

/// Company profile.
///
/// ```json
/// {
///     "country": "US",
///     "currency": "USD",
///     "estimateCurrency": "USD",
///     "exchange": "NASDAQ NMS - GLOBAL MARKET",
///     "finnhubIndustry": "Technology",
///     "ipo": "1980-12-12",
///     "logo": "https://static2.finnhub.io/file/publicdatany/finnhubimage/stock_logo/AAPL.png",
///     "marketCapitalization": 2959047.923065,
///     "name": "Apple Inc",
///     "phone": "14089961010",
///     "shareOutstanding": 15037.87,
///     "ticker": "AAPL",
///     "weburl": "https://www.apple.com/"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "finnhubIndustry")]
    pub industry: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub estimate_currency: Option<String>,
    pub ipo: Option<String>,
    pub logo: Option<String>,
    #[serde(rename = "marketCapitalization")]
    pub market_cap: Option<f64>,
    pub phone: Option<String>,
    #[serde(rename = "shareOutstanding")]
    pub shares_outstanding: Option<f64>,
    pub weburl: Option<String>,
}

/// Real-time quote.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Quote {
    #[serde(rename(deserialize = "c"))]
    pub current: f64,
    #[serde(rename(deserialize = "d"))]
    pub change: Option<f64>,
    #[serde(rename(deserialize = "dp"))]
    pub percent_change: Option<f64>,
    #[serde(rename(deserialize = "h"))]
    pub high: f64,
    #[serde(rename(deserialize = "l"))]
    pub low: f64,
    #[serde(rename(deserialize = "o"))]
    pub open: f64,
    #[serde(rename(deserialize = "pc"))]
    pub previous_close: f64,
    #[serde(rename(deserialize = "t"))]
    pub timestamp: i64,
}

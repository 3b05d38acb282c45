//! Plumbing shared by the third-party market data APIs.
//!
//! Every API call is made up of the same components:
//! 1. HTTP
//!     a) client
//!     b) request
//!     c) status check
//!     d) deserializer
//!
//! 2. PostgreSQL
//!     a) connection
//!     b) query
//!     c) insert process, inside one transaction

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{trace, warn};

/// How long to back off once an API reports its rate limit is exhausted.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

/// Pause between consecutive calls when importing a list of symbols (≤ 60 calls/minute).
pub const THROTTLE: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("rate limit reached")]
    RateLimited,

    #[error("unexpected response status {0}")]
    Status(StatusCode),

    #[error("environment variable {0} must be set")]
    MissingKey(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Read an API key from the environment.
pub fn api_key(name: &'static str) -> Result<String, ApiError> {
    crate::http::var(name).map_err(|_| ApiError::MissingKey(name))
}

/// Send a request and deserialize the JSON body, mapping HTTP 429 to [`ApiError::RateLimited`].
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
        status if !status.is_success() => Err(ApiError::Status(status)),
        _ => {
            trace!("response received; deserializing body ...");
            Ok(response.json().await?)
        }
    }
}

/// Repeat `call` for as long as it is rate limited, sleeping [`RATE_LIMIT_BACKOFF`] in between.
pub async fn retry_rate_limited<T, F, Fut>(symbol: &str, mut call: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    loop {
        match call().await {
            Err(ApiError::RateLimited) => {
                warn!("rate limit reached; sleeping {RATE_LIMIT_BACKOFF:?} before retrying {symbol}");
                tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
            }
            other => return other,
        }
    }
}

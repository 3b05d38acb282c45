pub mod api;
pub mod fs;
pub mod stock;
pub mod trades;
pub(crate) mod tui;

use colored::Colorize;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};

/// Shortcut for required API elements.
pub mod http {
    pub use dotenv::var;
    pub use reqwest::Client as HttpClient;
    pub use tokio_postgres::Client as PgClient;
}

/// Build the HTTP client shared by every market data API.
///
/// The user agent is read from `USER_AGENT`, falling back to the crate name.
pub fn std_client_build() -> anyhow::Result<http::HttpClient> {
    let user_agent = http::var("USER_AGENT").unwrap_or_else(|_| "smarttick".to_string());
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Build a PostgreSQL connection pool from a connection string.
pub fn pg_pool(url: &str) -> anyhow::Result<Pool> {
    let mut pg_config = Config::new();
    pg_config.url = Some(url.to_string());
    pg_config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    let pool = pg_config.create_pool(Some(Runtime::Tokio1), tokio_postgres::NoTls)?;
    Ok(pool)
}

pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {}", format!("{:?}", time.elapsed()).cyan())
}

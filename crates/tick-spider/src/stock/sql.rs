//////////////////////////////////////////////////////////////////
// symbols
//////////////////////////////////////////////////////////////////

/// `stock.symbols` is the master table for companies, keyed by ticker symbol.
pub(crate) static SELECT_SYMBOL_PK: &str = "
    SELECT pk
    FROM stock.symbols
    WHERE symbol = $1
";

/// Company profiles are refreshed in place; a new symbol gets a new row.
pub(crate) static UPSERT_PROFILE: &str = "
    INSERT INTO stock.symbols (
        symbol, name, exchange, industry, currency, country, estimate_currency,
        ipo, logo, market_cap, phone, shares_outstanding, weburl
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    ON CONFLICT (symbol) DO UPDATE SET
        name = EXCLUDED.name,
        exchange = EXCLUDED.exchange,
        industry = EXCLUDED.industry,
        currency = EXCLUDED.currency,
        country = EXCLUDED.country,
        estimate_currency = EXCLUDED.estimate_currency,
        ipo = EXCLUDED.ipo,
        logo = EXCLUDED.logo,
        market_cap = EXCLUDED.market_cap,
        phone = EXCLUDED.phone,
        shares_outstanding = EXCLUDED.shares_outstanding,
        weburl = EXCLUDED.weburl
";

/// Symbols or names starting with `$1`.
pub(crate) static SEARCH_SYMBOLS: &str = "
    SELECT symbol, name
    FROM stock.symbols
    WHERE symbol ILIKE $1 OR name ILIKE $1
    ORDER BY symbol
    LIMIT $2
";

//////////////////////////////////////////////////////////////////
// prices
//////////////////////////////////////////////////////////////////

/// `stock.prices` holds daily OHLCV data, raw and adjusted.
pub(crate) static INSERT_PRICE: &str = "
    INSERT INTO stock.prices (
        symbol_pk, dt, opening, high, low, closing, volume,
        adj_open, adj_high, adj_low, adj_close, adj_volume
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    ON CONFLICT (symbol_pk, dt) DO NOTHING
";

//////////////////////////////////////////////////////////////////
// metrics
//////////////////////////////////////////////////////////////////

/// `stock.metrics` keeps one dated snapshot of key financial metrics per import.
pub(crate) static INSERT_METRICS: &str = "
    INSERT INTO stock.metrics (
        symbol_pk, dated,
        ten_day_avg_volume, thirteen_week_return,
        fifty_two_wk_high, fifty_two_wk_high_date, fifty_two_wk_low, fifty_two_wk_low_date,
        beta, pe_ttm, pb, ps_ttm, dividend_yield_ttm,
        current_ratio_quarterly, quick_ratio_quarterly,
        roe_ttm, roa_ttm, eps_ttm, rev_per_share_ttm, rev_growth_ttm_yoy, eps_growth_ttm_yoy
    )
    VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
        $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
    )
";

//////////////////////////////////////////////////////////////////
// trades
//////////////////////////////////////////////////////////////////

/// `congress.trades` holds every scraped trade disclosure; the table is replaced wholesale on
/// each import.
pub(crate) static DELETE_TRADES: &str = "DELETE FROM congress.trades";

pub(crate) static INSERT_TRADE: &str = "
    INSERT INTO congress.trades (
        politician_name, politician_family, politician_link,
        traded_issuer_name, traded_issuer_ticker, traded_issuer_link,
        published, traded, filed_after, owner, type, size, price
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
";

/// Dated (date, direction, size) rows for tickers matching `$1`, oldest first.
pub(crate) static SELECT_TRIPLES: &str = "
    SELECT traded, type, size
    FROM congress.trades
    WHERE traded_issuer_ticker ILIKE $1
        AND traded IS NOT NULL
    ORDER BY traded
";

pub(crate) static SELECT_TRADES_BY_TICKER: &str = "
    SELECT
        politician_name, politician_family, politician_link,
        traded_issuer_name, traded_issuer_ticker, traded_issuer_link,
        published, traded, filed_after, owner, type, size, price
    FROM congress.trades
    WHERE traded_issuer_ticker ILIKE $1
    ORDER BY traded DESC NULLS LAST
";

pub(crate) static SELECT_RECENT_TRADES: &str = "
    SELECT
        politician_name, politician_family, politician_link,
        traded_issuer_name, traded_issuer_ticker, traded_issuer_link,
        published, traded, filed_after, owner, type, size, price
    FROM congress.trades
    ORDER BY traded DESC NULLS LAST
    LIMIT $1
";

//////////////////////////////////////////////////////////////////
// politician images
//////////////////////////////////////////////////////////////////

/// `congress.politician_imgs` holds one portrait per politician; replaced wholesale on import.
pub(crate) static DELETE_IMAGES: &str = "DELETE FROM congress.politician_imgs";

pub(crate) static INSERT_IMAGE: &str = "
    INSERT INTO congress.politician_imgs (politician_name, politician_family, img)
    VALUES ($1, $2, $3)
";

use crate::cli::{Symbols, Target};
use deadpool_postgres::Pool;
use tick_spider as spider;
use tracing::{debug, info};

/// Run one import.
pub(crate) async fn run(pool: &Pool, target: Target, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();
    match target {
        Target::Trades { file, chunk_size } => {
            let report = spider::trades::import::import_file(pool, &file, chunk_size, tui).await?;
            debug!("{report:?}");
            if tui {
                println!(
                    "{} of {} trades loaded ({} dates parsed, {} unparsable, {} missing, {} records rejected)",
                    report.inserted,
                    report.records,
                    report.dates_parsed,
                    report.dates_failed,
                    report.dates_missing,
                    report.rejected
                );
            }
        }
        Target::Images { file } => {
            let report = spider::trades::images::import_images(pool, &file, tui).await?;
            debug!("{report:?}");
            if tui {
                println!(
                    "{} of {} politician images loaded ({} records rejected)",
                    report.inserted, report.records, report.rejected
                );
            }
        }
        Target::Prices { symbol, start, end } => {
            let tiingo = spider::stock::tiingo::Tiingo::from_env()?;
            let inserted =
                spider::stock::tiingo::import_daily_prices(pool, &tiingo, &symbol, start, end).await?;
            if tui {
                println!("imported {inserted} rows for {}", symbol.to_uppercase());
            }
        }
        Target::Profiles(symbols) => {
            let finnhub = spider::stock::finnhub::Finnhub::from_env()?;
            let symbols = resolve(symbols)?;
            let processed =
                spider::stock::symbols::import_profiles(pool, &finnhub, &symbols, tui).await?;
            if tui {
                println!("done; processed {processed}/{} symbols", symbols.len());
            }
        }
        Target::Financials(symbols) => {
            let finnhub = spider::stock::finnhub::Finnhub::from_env()?;
            let symbols = resolve(symbols)?;
            let processed =
                spider::stock::metrics::import_financials(pool, &finnhub, &symbols, tui).await?;
            if tui {
                println!("done; processed {processed}/{} symbols", symbols.len());
            }
        }
    }

    info!("import finished, time elapsed: {:?}", time.elapsed());
    Ok(())
}

// symbols given on the command line, or else every constituent
fn resolve(symbols: Symbols) -> anyhow::Result<Vec<String>> {
    if symbols.symbols.is_empty() {
        spider::stock::constituents::read_constituents(&symbols.constituents)
    } else {
        Ok(symbols.symbols)
    }
}

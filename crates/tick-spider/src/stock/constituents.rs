use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct Constituent {
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Read the `Symbol` column of a constituents CSV file (e.g. `data/constituents.csv`).
pub fn read_constituents(path: impl AsRef<Path>) -> anyhow::Result<Vec<String>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|err| {
        error!("failed to open {}, error({err})", path.display());
        err
    })?;

    let mut symbols = Vec::new();
    for record in reader.deserialize::<Constituent>() {
        let symbol = record?.symbol.trim().to_string();
        if !symbol.is_empty() {
            symbols.push(symbol);
        }
    }
    debug!("{} symbols read from {}", symbols.len(), path.display());

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_symbol_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Symbol,Security,GICS Sector").unwrap();
        writeln!(file, "MMM,3M,Industrials").unwrap();
        writeln!(file, " AOS ,A. O. Smith,Industrials").unwrap();
        writeln!(file, ",Nothing,Nowhere").unwrap();
        writeln!(file, "\"BRK.B\",Berkshire Hathaway,Financials").unwrap();

        let symbols = read_constituents(file.path()).unwrap();
        assert_eq!(symbols, ["MMM", "AOS", "BRK.B"]);
    }

    #[test]
    fn missing_symbol_column_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Security").unwrap();
        writeln!(file, "MMM,3M").unwrap();

        assert!(read_constituents(file.path()).is_err());
    }
}

use std::path::Path;
use tracing::{error, trace};

/// Reads a `.json` file from `path`.
pub async fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await.map_err(|err| {
        error!("failed to read {}, error({err})", path.display());
        err
    })?;

    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file).map_err(|err| {
        error!("failed to decode JSON from {}, error({err})", path.display());
        err
    })?;
    Ok(data)
}

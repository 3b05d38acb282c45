//! Politician portraits, shown alongside their trades.

use super::sql;
use crate::http::PgClient;
use deadpool_postgres::Pool;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

/// Portraits sent to the database per batch.
pub const DEFAULT_IMAGE_CHUNK_SIZE: usize = 100;

/// One entry of the scraped portraits file.
///
/// ```json
/// {
///     "politician_name": "Nancy Pelosi",
///     "politician_family": "Democrat House CA",
///     "img": "https://www.capitoltrades.com/assets/politicians/P000197.jpg"
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ScrapedImage {
    pub politician_name: Option<String>,
    pub politician_family: Option<String>,
    pub img: Option<String>,
}

/// A row of `congress.politician_imgs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoliticianImage {
    pub politician_name: String,
    pub politician_family: Option<String>,

    /// Image URL.
    pub img: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageReport {
    pub records: usize,
    pub inserted: usize,

    /// Entries without a politician name.
    pub rejected: usize,
}

/// Map scraped entries to rows; entries without a politician name are rejected.
pub fn prepare_images(scraped: Vec<ScrapedImage>) -> (Vec<PoliticianImage>, ImageReport) {
    let mut report = ImageReport {
        records: scraped.len(),
        ..Default::default()
    };

    let images = scraped
        .into_iter()
        .enumerate()
        .filter_map(|(i, image)| {
            let name = image
                .politician_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty());
            let Some(politician_name) = name else {
                warn!("rejecting image #{i}: missing politician name");
                report.rejected += 1;
                return None;
            };

            Some(PoliticianImage {
                politician_name,
                politician_family: image.politician_family,
                img: image.img,
            })
        })
        .collect();

    (images, report)
}

/// Replace the contents of `congress.politician_imgs` with the portraits listed in `path`.
///
/// As with trades, the table is cleared and refilled inside one transaction.
pub async fn import_images(
    pool: &Pool,
    path: impl AsRef<Path>,
    tui: bool,
) -> anyhow::Result<ImageReport> {
    let time = std::time::Instant::now();
    let path = path.as_ref();

    info!("reading politician images from {} ...", path.display());
    let scraped: Vec<ScrapedImage> = crate::fs::read_json(path).await?;
    let (images, mut report) = prepare_images(scraped);
    if images.is_empty() {
        warn!("no images found in {}", path.display());
    }

    let mut pg_client = pool.get().await?;
    report.inserted = replace_all(&mut pg_client, &images, tui).await?;

    info!(
        "{} politician images loaded from {}. {}",
        report.inserted,
        path.display(),
        crate::time_elapsed(time)
    );
    Ok(report)
}

async fn replace_all(
    pg_client: &mut PgClient,
    images: &[PoliticianImage],
    tui: bool,
) -> anyhow::Result<usize> {
    let query = pg_client.prepare(sql::INSERT_IMAGE).await?;
    let transaction = pg_client.transaction().await?;

    debug!("clearing existing politician images ...");
    transaction
        .execute(sql::DELETE_IMAGES, &[])
        .await
        .map_err(|err| {
            error!("failed to clear congress.politician_imgs, error({err})");
            err
        })?;

    let pb = crate::tui::progress_bar(images.len(), "images", tui)?;
    for (i, chunk) in images.chunks(DEFAULT_IMAGE_CHUNK_SIZE).enumerate() {
        try_join_all(chunk.iter().map(|image| {
            let transaction = &transaction;
            let query = &query;
            async move {
                transaction
                    .execute(
                        query,
                        &[&image.politician_name, &image.politician_family, &image.img],
                    )
                    .await
            }
        }))
        .await
        .map_err(|err| {
            error!("failed to insert image chunk {}, error({err})", i + 1);
            err
        })?;

        pb.inc(chunk.len() as u64);
        trace!("image chunk {} inserted", i + 1);
    }
    pb.finish_and_clear();

    transaction.commit().await.map_err(|err| {
        error!("failed to commit politician images, changes rolled back, error({err})");
        err
    })?;

    Ok(images.len())
}

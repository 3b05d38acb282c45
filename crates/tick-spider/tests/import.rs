use std::io::Write;
use tick_spider::trades::import::{prepare, ImportReport, ScrapedTrade};
use tick_spider::trades::{aggregate, Direction};

const SCRAPED: &str = r#"[
    {
        "politician_name": "Jane Doe",
        "politician_family": "Democrat House CA",
        "traded_issuer_name": "Apple Inc",
        "traded_issuer_ticker": "AAPL:US",
        "published": "5 Mar 2024",
        "traded": "1 Mar 2024",
        "type": "buy",
        "size": "1K–15K",
        "price": "$179.66"
    },
    {
        "politician_name": "John Roe",
        "traded_issuer_name": "Apple Inc",
        "traded_issuer_ticker": "AAPL:US",
        "traded": "28 Sept 2024",
        "type": "sell",
        "size": "50K–100K"
    },
    {
        "politician_name": "John Roe",
        "traded_issuer_name": "Apple Inc",
        "traded": "N/A",
        "type": "buy",
        "size": "1K–15K"
    },
    {
        "traded_issuer_name": "Apple Inc",
        "traded": "1 Mar 2024",
        "type": "buy"
    }
]"#;

#[tokio::test]
async fn scraper_output_to_monthly_summary() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCRAPED.as_bytes()).unwrap();

    let scraped: Vec<ScrapedTrade> = tick_spider::fs::read_json(file.path()).await.unwrap();
    let (records, report) = prepare(scraped);

    assert_eq!(
        report,
        ImportReport {
            records: 4,
            inserted: 0,
            rejected: 1,
            dates_parsed: 3,
            dates_failed: 1,
            dates_missing: 0,
        }
    );
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].direction, Direction::Sell);

    let summary = aggregate(records.iter().map(|record| record.triple()));
    assert_eq!(summary.skipped, 1);

    let labels: Vec<&str> = summary.months.iter().map(|m| m.month_label.as_str()).collect();
    assert_eq!(labels, ["2024-03", "2024-09"]);
    assert_eq!(summary.months[0].buy_total, 8_000.0);
    assert_eq!(summary.months[1].sell_total, 75_000.0);
}

#[tokio::test]
async fn scraper_output_must_be_an_array() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"politician_name": "Jane Doe"}"#).unwrap();

    let result: anyhow::Result<Vec<ScrapedTrade>> = tick_spider::fs::read_json(file.path()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn portraits_file_to_rows() {
    use tick_spider::trades::images::{prepare_images, ScrapedImage};

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
            {"politician_name": "Jane Doe", "politician_family": "Democrat House CA", "img": "https://example.com/jd.jpg"},
            {"politician_family": "Republican Senate TX", "img": "https://example.com/x.jpg"}
        ]"#,
    )
    .unwrap();

    let scraped: Vec<ScrapedImage> = tick_spider::fs::read_json(file.path()).await.unwrap();
    let (images, report) = prepare_images(scraped);

    assert_eq!(report.records, 2);
    assert_eq!(report.rejected, 1);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].politician_name, "Jane Doe");
    assert_eq!(images[0].img.as_deref(), Some("https://example.com/jd.jpg"));
}

//! Gold price scraper
//!
//! Fetches one HTML page and extracts labelled fields by CSS selector:
//! - Field registry with unique labels and optional value transforms
//! - Concurrent extraction into a timestamped snapshot
//! - Plain text and JSON reports
//! - HTTP and static document sources

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod logger;
pub mod registry;
pub mod report;
pub mod source;
pub mod transform;

pub use config::Config;
pub use document::{Accessor, Document, Node, Query};
pub use engine::{extract, ExtractionResult, ReportSnapshot};
pub use error::{ConfigError, FetchError, RegistryError, ReportError, TransformError};
pub use registry::{FieldDef, FieldRegistry, FieldSpec};
pub use report::{ReportFormat, Reporter};
pub use source::{DocumentSource, HttpSource, StaticSource};
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_page_report() {
        let source = StaticSource::new(r#"<html><body><div id="a">2450</div></body></html>"#);
        let mut registry = FieldRegistry::new();
        registry
            .register("buy", "#a", None)
            .unwrap()
            .register("sell", "#b", None)
            .unwrap();

        let doc = source.fetch("https://example.com").await.unwrap();
        let snapshot = extract(&doc, &registry).await;
        let report = Reporter::new("prices:").render(snapshot, ReportFormat::PlainText).unwrap();

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("prices: "));
        assert_eq!(&lines[1..], &["buy : 2450", "sell : "]);
    }

    #[tokio::test]
    async fn test_gold_page() {
        let html = r#"
        <html><body>
          <span id="DetailPlace_uc_goldprices1_lblBLBuy"><b><font>41,550.00</font></b></span>
          <span id="DetailPlace_uc_goldprices1_lblBLSell"><b><font>41,650.00</font></b></span>
          <span id="DetailPlace_uc_goldprices1_lblOMBuy"><b><font>40,779.84</font></b></span>
          <span id="DetailPlace_uc_goldprices1_lblOMSell"><b><font>42,150.00</font></b></span>
        </body></html>
        "#;
        let doc = StaticSource::new(html).fetch(config::DEFAULT_URL).await.unwrap();
        let registry = registry::gold_prices().unwrap();

        let snapshot = extract(&doc, &registry).await;
        let values: Vec<&str> = snapshot.results().iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["41,550.00", "41,650.00", "40,779.84", "42,150.00"]);

        let report = Reporter::default().render(snapshot, ReportFormat::PlainText).unwrap();
        assert_eq!(report.lines().count(), 5);
        assert!(report.contains("ทองคำแท่งขายออก : 41,650.00\n"));
    }
}

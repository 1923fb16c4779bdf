//! Document sources: where parsed pages come from
//!
//! [`HttpSource`] performs a single GET per fetch (no retries).
//! [`StaticSource`] serves a fixed HTML string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::document::Document;
use crate::error::FetchError;

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("goldprice/", env!("CARGO_PKG_VERSION"));

/// Anything that can turn a URL into a parsed document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError>;

    /// Fetch, giving up with [`FetchError::Cancelled`] once `cancel` fires.
    async fn fetch_with_cancel(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Document, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(url = %url, "fetch cancelled");
                Err(FetchError::Cancelled)
            }
            doc = self.fetch(url) => doc,
        }
    }
}

/// HTTP document source backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let url = Url::parse(url)?;
        info!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                FetchError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "non-success status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            if !is_html_content_type(content_type) {
                warn!(
                    url = %url,
                    content_type = ?content_type,
                    "parsing non-HTML response as HTML"
                );
            }
        }

        let body = response.bytes().await.map_err(FetchError::Network)?;
        debug!(url = %url, bytes = body.len(), "response received");

        // Invalid bytes become U+FFFD; the parser is lenient about the rest
        parse_body(&String::from_utf8_lossy(&body))
    }
}

fn is_html_content_type(value: &HeaderValue) -> bool {
    let Ok(value) = value.to_str() else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

fn parse_body(html: &str) -> Result<Document, FetchError> {
    if html.trim().is_empty() {
        return Err(FetchError::ParseFailure("empty document".to_string()));
    }
    Ok(Document::parse(html))
}

/// Serves the same HTML for every URL.
#[derive(Debug, Clone)]
pub struct StaticSource {
    html: String,
}

impl StaticSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        debug!(url = %url, "serving static document");
        parse_body(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Query;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a random local port.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static [u8],
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: {content_type}\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/")
    }

    fn first_text(doc: &Document, selector: &str) -> Option<String> {
        Query::parse(selector).unwrap().first_value(doc)
    }

    fn source() -> HttpSource {
        HttpSource::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_parses_html() {
        let url = serve_once(
            "200 OK",
            "text/html; charset=utf-8",
            br#"<html><body><span id="a">2450</span></body></html>"#,
        )
        .await;

        let doc = source().fetch(&url).await.unwrap();
        assert_eq!(first_text(&doc, "#a").as_deref(), Some("2450"));
    }

    #[tokio::test]
    async fn non_success_status() {
        let url = serve_once("503 Service Unavailable", "text/html", b"down").await;

        let err = source().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn stray_invalid_byte_is_replaced() {
        let url = serve_once(
            "200 OK",
            "text/html",
            b"<span id=\"a\">2450</span><!-- \xA9 --><span id=\"b\">x\xFFy</span>",
        )
        .await;

        let doc = source().fetch(&url).await.unwrap();
        assert_eq!(first_text(&doc, "#a").as_deref(), Some("2450"));
        assert_eq!(first_text(&doc, "#b").as_deref(), Some("x\u{FFFD}y"));
    }

    #[tokio::test]
    async fn non_html_content_type_is_still_parsed() {
        let url = serve_once(
            "200 OK",
            "text/plain; charset=utf-8",
            br#"<span id="a">2450</span>"#,
        )
        .await;

        let doc = source().fetch(&url).await.unwrap();
        assert_eq!(first_text(&doc, "#a").as_deref(), Some("2450"));
    }

    #[tokio::test]
    async fn empty_body_is_parse_failure() {
        let url = serve_once("200 OK", "text/html", b"  \n").await;

        let err = source().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::ParseFailure(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Bind then drop to get a port nobody is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source().fetch(&format!("http://{addr}/")).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn invalid_url() {
        let err = source().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn cancelled_fetch() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = StaticSource::new("<p>x</p>")
            .fetch_with_cancel("http://example.invalid/", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Cancelled));
    }

    #[tokio::test]
    async fn static_source() {
        let doc = StaticSource::new("<p class=v>x</p>").fetch("anything").await.unwrap();
        assert_eq!(first_text(&doc, "p.v").as_deref(), Some("x"));

        let err = StaticSource::new("  ").fetch("anything").await.unwrap_err();
        assert!(matches!(err, FetchError::ParseFailure(_)));
    }
}

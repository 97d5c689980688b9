//! HTTP fetcher
//!
//! Every outbound request of a harvest goes through one `PageFetcher`:
//! a reqwest client carrying the fixed user-agent the site expects, with
//! a fixed-delay single retry on 503 responses. The fetcher does no
//! caching; it fetches exactly what it is asked for.

use crate::config::{CrawlerConfig, SiteConfig};
use crate::HarvestError;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// HTTP client bound to one site root
pub struct PageFetcher {
    client: Client,
    root: String,
    retry_delay: Duration,
}

impl PageFetcher {
    /// Builds a fetcher for the configured site.
    pub fn new(site: &SiteConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(site.user_agent.clone())
            .timeout(Duration::from_secs(crawler.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            root: site.root_url.trim_end_matches('/').to_string(),
            retry_delay: Duration::from_secs(crawler.retry_delay_seconds),
        })
    }

    /// Fetches one page relative to the site root and returns its body.
    ///
    /// A 503 response is retried exactly once after the configured fixed
    /// delay; a second failure propagates. Every other non-success status
    /// fails the call immediately.
    pub async fn fetch(&self, path: &str) -> Result<String, HarvestError> {
        let mut response = self.request(path).await?;

        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(
                "503 for {}, retrying once in {}s",
                path,
                self.retry_delay.as_secs()
            );
            tokio::time::sleep(self.retry_delay).await;
            response = self.request(path).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Fetch {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| HarvestError::Http {
            path: path.to_string(),
            source,
        })
    }

    async fn request(&self, path: &str) -> Result<Response, HarvestError> {
        let url = format!("{}{}", self.root, path);
        tracing::debug!("GET {}", url);
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                path: path.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(root_url: &str) -> PageFetcher {
        let site = SiteConfig {
            root_url: root_url.to_string(),
            user_agent: "TestAgent/1.0".to_string(),
        };
        let crawler = CrawlerConfig {
            retry_delay_seconds: 0,
            request_timeout_seconds: 5,
        };
        PageFetcher::new(&site, &crawler).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(&server.uri());
        let body = fetcher.fetch("/page").await.unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_fetch_sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(wiremock::matchers::header("user-agent", "TestAgent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = test_fetcher(&server.uri());
        fetcher.fetch("/page").await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_fatal_for_the_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = test_fetcher(&server.uri());
        let err = fetcher.fetch("/missing").await.unwrap_err();
        match err {
            HarvestError::Fetch { path, status } => {
                assert_eq!(path, "/missing");
                assert_eq!(status, 404);
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_503_is_retried_exactly_once() {
        let server = MockServer::start().await;
        // First response is a 503, the mounted fallback then serves 200.
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = test_fetcher(&server.uri());
        let body = fetcher.fetch("/flaky").await.unwrap();
        assert_eq!(body, "recovered");
    }

    #[tokio::test]
    async fn test_persistent_503_propagates_after_single_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = test_fetcher(&server.uri());
        let err = fetcher.fetch("/down").await.unwrap_err();
        assert!(matches!(err, HarvestError::Fetch { status: 503, .. }));
    }
}

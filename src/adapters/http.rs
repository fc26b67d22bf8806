use crate::core::{ConfigProvider, PageFetcher};
use crate::domain::model::FetchedPage;
use crate::utils::error::{EtlError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;

/// One-shot page fetcher. Redirects and timeouts are reqwest's defaults.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let headers = build_headers(config)?;
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

fn build_headers<C: ConfigProvider>(config: &C) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(config.user_agent()).map_err(|e| {
        EtlError::InvalidConfigValueError {
            field: "source.user_agent".to_string(),
            value: config.user_agent().to_string(),
            reason: e.to_string(),
        }
    })?;
    headers.insert(USER_AGENT, user_agent);

    for (name, value) in config.extra_headers() {
        let invalid = |reason: String| EtlError::InvalidConfigValueError {
            field: "source.headers".to_string(),
            value: format!("{}: {}", name, value),
            reason,
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);

        let body = response.text().await?;
        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrapeConfig;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_returns_body() {
        let server = MockServer::start();
        let config = ScrapeConfig::default();

        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/procurement/bids/")
                .header("User-Agent", config.user_agent());
            then.status(200).body("<html></html>");
        });

        let fetcher = HttpFetcher::new(&config).unwrap();
        let page = fetcher
            .fetch(&server.url("/procurement/bids/"))
            .await
            .unwrap();

        page_mock.assert();
        assert!(page.is_success());
        assert_eq!(page.body, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_reports_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not here");
        });

        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();
        let page = fetcher.fetch(&server.url("/missing")).await.unwrap();

        assert_eq!(page.status, 404);
        assert!(!page.is_success());
    }

    #[tokio::test]
    async fn test_extra_headers_are_sent() {
        let server = MockServer::start();
        let mut config = ScrapeConfig::default();
        config
            .source
            .headers
            .insert("Accept-Language".to_string(), "en-US".to_string());

        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/").header("Accept-Language", "en-US");
            then.status(200);
        });

        let fetcher = HttpFetcher::new(&config).unwrap();
        fetcher.fetch(&server.url("/")).await.unwrap();

        page_mock.assert();
    }

    #[test]
    fn test_invalid_header_is_config_error() {
        let mut config = ScrapeConfig::default();
        config
            .source
            .headers
            .insert("Bad Header".to_string(), "x".to_string());

        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    }
}

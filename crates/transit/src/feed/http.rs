//! `reqwest`-backed fetcher for the RapidAPI-hosted TransLoc API.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::feed::config::TransLocConfig;
use crate::feed::traits::DataFetcher;
use crate::models::types::{Result, TransitError};

/// HTTP fetcher that authenticates every request with the RapidAPI headers
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &TransLocConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-key", header_value(&config.api_key)?);
        headers.insert("x-rapidapi-host", header_value(&config.api_host)?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransitError::Http(e.to_string()))?;

        Ok(Self { client })
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| TransitError::InvalidData("API credentials contain invalid header characters".into()))
}

impl DataFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            debug!("GET {url}");

            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|e| TransitError::Http(e.to_string()))?;

            let body = response
                .bytes()
                .await
                .map_err(|e| TransitError::Http(e.to_string()))?;

            Ok(body.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_credentials_with_newlines() {
        let config = TransLocConfig::new("bad\nkey", "host");
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(TransitError::InvalidData(_))
        ));
    }

    #[test]
    fn test_builds_with_plain_credentials() {
        let config = TransLocConfig::new("0123456789abcdef", "transloc-api-1-2.p.rapidapi.com");
        assert!(HttpFetcher::new(&config).is_ok());
    }
}

//! HTTP transport
//!
//! Fetches pages with a shared `reqwest` client and keeps a bounded number of requests
//! in flight while the crawl expands.

use crate::config::{TransportConfig, UserAgentConfig};
use crate::transport::{FetchResponse, ResponseHandler, Transport};
use crate::url::{normalize_location, subpath_to};
use crate::{FetchError, ScrapeError};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::VecDeque;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `transport` - Timeout settings
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    transport: &TransportConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(transport.timeout_secs);

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP(S)
///
/// Redirects are followed, so a response may come from a different location than the
/// one requested. Only responses that end up under the base location are processable.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    max_concurrent_requests: usize,
}

impl HttpTransport {
    /// Creates a transport from the transport and user agent configuration
    ///
    /// # Arguments
    ///
    /// * `transport` - Timeout and concurrency settings
    /// * `user_agent` - The user agent configuration
    /// * `base_url` - Location that processable responses must stay under
    pub fn new(
        transport: &TransportConfig,
        user_agent: &UserAgentConfig,
        base_url: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self::with_client(
            build_http_client(transport, user_agent)?,
            normalize_location(base_url)?,
            transport.max_concurrent_requests,
        ))
    }

    /// Creates a transport around an existing client
    pub fn with_client(client: Client, base_url: Url, max_concurrent_requests: usize) -> Self {
        Self {
            client,
            base_url,
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_one(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let http_error = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Links in the body are relative to where redirects ended up
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(http_error)?;

        tracing::trace!("Fetched {} ({} bytes)", final_url, body.len());
        let fetched = FetchResponse::new(final_url, body.to_vec());
        Ok(match content_type {
            Some(content_type) => fetched.with_content_type(content_type),
            None => fetched,
        })
    }

    async fn expand(&self, seed: &Url, handler: &ResponseHandler<'_>) -> Result<(), ScrapeError> {
        let mut pending = VecDeque::from([seed.clone()]);
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < self.max_concurrent_requests {
                let Some(url) = pending.pop_front() else {
                    break;
                };
                in_flight.push(async move {
                    let result = self.fetch_one(&url).await;
                    (url, result)
                });
            }

            let Some((url, result)) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(response) => pending.extend(handler(response)?),
                Err(e) => tracing::warn!("Skipping {}: {}", url, e),
            }
        }

        Ok(())
    }

    fn is_processable(&self, response: &FetchResponse) -> bool {
        if subpath_to(&self.base_url, &response.url).is_none() {
            tracing::debug!("Ignoring {}: outside {}", response.url, self.base_url);
            return false;
        }

        if !response.is_html() {
            tracing::debug!(
                "Ignoring {}: not HTML ({})",
                response.url,
                response.content_type.as_deref().unwrap_or("unknown type")
            );
            return false;
        }

        !response.is_blank()
    }
}

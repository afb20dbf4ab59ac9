//! Transports: how pages are fetched and how a crawl is driven
//!
//! A transport owns all retrieval I/O. The crawler hands it a seed location and a
//! response handler; the transport fetches, calls the handler, and keeps fetching the
//! locations the handler returns until none are left. The handler decides which
//! locations are new, so the transport never needs its own de-duplication.

mod file;
mod http;

pub use file::FileTransport;
pub use http::HttpTransport;

use crate::{FetchError, ScrapeError};
use async_trait::async_trait;
use url::Url;

/// Media types run through the pipeline
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// A fetched resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Location the body was read from
    pub url: Url,

    /// Raw body bytes
    pub body: Vec<u8>,

    /// Declared media type, when the transport knows one
    pub content_type: Option<String>,
}

impl FetchResponse {
    pub fn new(url: Url, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url,
            body: body.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns true if the response looks like an HTML page
    ///
    /// A declared media type decides on its own. Without one, the body must at least
    /// be valid UTF-8, which rules out images, archives and other binary assets.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(content_type) => {
                let essence = content_type
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase();
                HTML_MEDIA_TYPES.contains(&essence.as_str())
            }
            None => std::str::from_utf8(&self.body).is_ok(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns true if the body is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Called once per fetched location; returns the locations to fetch next
///
/// An `Err` aborts the crawl and is returned from [`Transport::expand`].
pub type ResponseHandler<'a> =
    dyn Fn(FetchResponse) -> Result<Vec<Url>, ScrapeError> + Send + Sync + 'a;

/// Retrieval backend of a crawler
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a single location
    async fn fetch_one(&self, url: &Url) -> Result<FetchResponse, FetchError>;

    /// Fetches `seed` and every location the handler returns, transitively
    ///
    /// Fetch errors are logged and the location is dropped. The call returns once no
    /// fetch is pending, or with the first handler error.
    async fn expand(&self, seed: &Url, handler: &ResponseHandler<'_>) -> Result<(), ScrapeError>;

    /// Decides whether a response is worth running through the pipeline
    ///
    /// The default accepts non-blank HTML responses.
    fn is_processable(&self, response: &FetchResponse) -> bool {
        !response.is_blank() && response.is_html()
    }
}

//! docscrape: a documentation-site crawl engine
//!
//! This crate discovers and fetches every reachable internal page of a documentation
//! site exactly once, runs each page through an ordered filter pipeline, and emits one
//! structured record per page. Retrieval is delegated to a [`transport::Transport`]
//! (HTTP or filesystem), so the traversal itself never depends on how pages are read.

pub mod config;
pub mod crawler;
pub mod instrument;
pub mod pipeline;
pub mod transport;
pub mod url;

use thiserror::Error;

/// Main error type for docscrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid location: {0}")]
    Location(#[from] LocationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}

/// Raised when a base or root location cannot be turned into an absolute location
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Failed to parse location '{location}': {message}")]
    Parse { location: String, message: String },

    #[error("Location '{0}' is not absolute")]
    NotAbsolute(String),

    #[error("Unsupported scheme in '{0}'")]
    InvalidScheme(String),
}

/// Errors surfaced by a transport for a single location
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("IO error for {url}: {source}")]
    Io { url: String, source: std::io::Error },

    #[error("Location {0} is outside the transport's base location")]
    OutOfScope(String),
}

/// Errors raised by a filter while processing one resource
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Filter '{filter}' expected an HTML document")]
    ExpectedHtml { filter: String },

    #[error("Filter '{filter}' has an invalid selector '{selector}'")]
    InvalidSelector { filter: String, selector: String },

    #[error("Filter '{filter}' found no element matching '{selector}' in {url}")]
    MissingElement {
        filter: String,
        selector: String,
        url: String,
    },

    #[error("Filter '{filter}' failed: {message}")]
    Failed { filter: String, message: String },
}

/// Errors raised while turning a response body into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Result type alias for docscrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlConfig, EffectiveOptions};
pub use crawler::Crawler;
pub use pipeline::{Document, ResultRecord};
pub use transport::{FetchResponse, FileTransport, HttpTransport, Transport};
pub use url::LocationResolver;

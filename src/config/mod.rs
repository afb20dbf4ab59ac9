//! Configuration module for docscrape
//!
//! This module holds the static crawler description ([`CrawlConfig`]), the options a
//! single crawl runs with ([`EffectiveOptions`]), and loading/validation of TOML
//! configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docscrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docs.toml")).unwrap();
//! println!("Crawling from: {}", config.scraper.base_url());
//! ```

mod effective;
mod parser;
mod types;
mod validation;

// Re-export types
pub use effective::EffectiveOptions;
pub use types::{
    Config, CrawlConfig, CrawlConfigBuilder, CrawlOptions, FilterConfig, FilterStack,
    TransportConfig, TransportKind, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

//! Transform pipeline
//!
//! An ordered structural stage followed by an ordered text stage. Each filter sees the
//! document produced by the one before it, so order is part of the contract: a filter
//! can rely on every earlier filter of the pipeline having run.

mod document;
mod filter;
pub mod filters;
mod record;
mod registry;

pub use document::{Document, HtmlParser, Parser};
pub use filter::{Filter, FilterContext};
pub use record::{RecordValue, ResultRecord, INTERNAL_URLS};
pub use registry::FilterRegistry;

use crate::config::{CrawlConfig, FilterStack};
use crate::{ConfigError, ConfigResult, FilterError};
use std::sync::Arc;

/// The filters run over every processed page
#[derive(Clone)]
pub struct Pipeline {
    html_filters: Vec<Arc<dyn Filter>>,
    text_filters: Vec<Arc<dyn Filter>>,
}

impl Pipeline {
    pub fn new(html_filters: Vec<Arc<dyn Filter>>, text_filters: Vec<Arc<dyn Filter>>) -> Self {
        Self {
            html_filters,
            text_filters,
        }
    }

    /// Builds the pipeline named by a crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Every configured filter was found in the registry
    /// * `Err(ConfigError::UnknownFilter)` - A configured name is not registered
    pub fn from_config(config: &CrawlConfig, registry: &FilterRegistry) -> ConfigResult<Self> {
        Ok(Self::new(
            lookup(config.html_filters(), registry)?,
            lookup(config.text_filters(), registry)?,
        ))
    }

    /// Filter names in execution order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters().map(|filter| filter.name()).collect()
    }

    /// Runs every filter over one document
    ///
    /// The first failing filter stops the run; its error is returned and the record
    /// holds whatever earlier filters wrote.
    pub fn run(
        &self,
        document: Document,
        context: &FilterContext,
        record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        let mut document = document;
        for filter in self.filters() {
            tracing::trace!("Running filter '{}' on {}", filter.name(), context.url());
            document = filter.call(document, context, record)?;
        }
        Ok(document)
    }

    fn filters(&self) -> impl Iterator<Item = &Arc<dyn Filter>> {
        self.html_filters.iter().chain(&self.text_filters)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("filters", &self.filter_names())
            .finish()
    }
}

fn lookup(stack: &FilterStack, registry: &FilterRegistry) -> ConfigResult<Vec<Arc<dyn Filter>>> {
    stack
        .names()
        .iter()
        .map(|name| {
            registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownFilter(name.clone()))
        })
        .collect()
}

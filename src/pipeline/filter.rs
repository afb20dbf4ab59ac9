use crate::config::EffectiveOptions;
use crate::pipeline::{Document, ResultRecord};
use crate::FilterError;
use std::sync::Arc;
use url::Url;

/// What a filter sees besides the document: the crawl's options and the page location
#[derive(Debug, Clone)]
pub struct FilterContext {
    options: Arc<EffectiveOptions>,
    url: Url,
}

impl FilterContext {
    pub fn new(options: Arc<EffectiveOptions>, url: Url) -> Self {
        Self { options, url }
    }

    pub fn options(&self) -> &EffectiveOptions {
        &self.options
    }

    /// Location the current page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// One step of the transform pipeline
///
/// A filter receives the document produced by the previous filter and returns the
/// document for the next one. It may also write keys into the record. Filters must not
/// keep per-page state: one instance serves every page of a crawl, possibly
/// concurrently.
pub trait Filter: Send + Sync {
    /// Name under which the filter is registered
    fn name(&self) -> &str;

    fn call(
        &self,
        document: Document,
        context: &FilterContext,
        record: &mut ResultRecord,
    ) -> Result<Document, FilterError>;
}

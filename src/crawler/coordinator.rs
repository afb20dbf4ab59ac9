//! Crawler coordinator - crawl orchestration logic
//!
//! The coordinator owns everything a crawl decides: where it starts, which discovered
//! locations are new, and what happens to each response. The transport owns only the
//! fetching and the order in which pending locations are visited.

use crate::config::{CrawlConfig, EffectiveOptions};
use crate::crawler::VisitedSet;
use crate::instrument::{Event, Instrumentation, NoopInstrumentation};
use crate::pipeline::{FilterContext, FilterRegistry, HtmlParser, Parser, Pipeline, ResultRecord};
use crate::transport::{FetchResponse, Transport};
use crate::url::LocationResolver;
use crate::{Result, ScrapeError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use url::Url;

/// A configured crawler over one transport
pub struct Crawler<T: Transport> {
    name: String,
    transport: T,
    resolver: LocationResolver,
    options: Arc<EffectiveOptions>,
    pipeline: Pipeline,
    parser: Box<dyn Parser>,
    instrumentation: Arc<dyn Instrumentation>,
}

impl<T: Transport> Crawler<T> {
    /// Creates a crawler using the built-in filters and the HTML parser
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `transport` - Where pages are fetched from
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Locations resolved and options composed
    /// * `Err(ScrapeError)` - Invalid base/root location, pattern, or filter name
    pub fn new(config: &CrawlConfig, transport: T) -> Result<Self> {
        Self::with_registry(config, transport, &FilterRegistry::with_defaults())
    }

    /// Creates a crawler whose filter names are looked up in `registry`
    pub fn with_registry(
        config: &CrawlConfig,
        transport: T,
        registry: &FilterRegistry,
    ) -> Result<Self> {
        let resolver = LocationResolver::new(config.base_url(), config.root_path())?;
        let options = EffectiveOptions::compose(config, &resolver)?;
        let pipeline = Pipeline::from_config(config, registry)?;

        tracing::debug!(
            "Crawler '{}' rooted at {} with filters {:?}",
            config.name(),
            resolver.root_url(),
            pipeline.filter_names()
        );

        Ok(Self {
            name: config.name().to_string(),
            transport,
            resolver,
            options,
            pipeline,
            parser: Box::new(HtmlParser),
            instrumentation: Arc::new(NoopInstrumentation),
        })
    }

    /// Replaces the parser that turns response bodies into documents
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Replaces the instrumentation sink
    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = instrumentation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Arc<EffectiveOptions> {
        &self.options
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the record for a single page, without following links
    ///
    /// An empty path or `/` is the root location; any other path is resolved against
    /// the base location.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - The page was processed
    /// * `Ok(None)` - The response was not processable
    /// * `Err(ScrapeError)` - Fetching, parsing or filtering failed
    pub async fn build_page(&self, path: &str) -> Result<Option<ResultRecord>> {
        let url = self.resolver.url_for(path)?;
        let response = self.transport.fetch_one(&url).await?;

        if !self.transport.is_processable(&response) {
            self.emit(&Event::IgnoreResponse { url: &response.url });
            return Ok(None);
        }

        self.process_response(&response).map(Some)
    }

    /// Crawls every reachable internal page, passing each record to `on_record`
    ///
    /// Each location is fetched at most once per call. A page whose filters fail is
    /// logged and skipped; a body that cannot be parsed aborts the crawl. Records
    /// already delivered stay delivered either way.
    ///
    /// # Crawl Steps
    ///
    /// 1. Mark the root location visited and emit `running`
    /// 2. Let the transport expand from the root location
    /// 3. For every response: ignore it, or process it and deliver the record
    /// 4. Hand the record's new internal locations back to the transport
    pub async fn build_pages<F>(&self, on_record: F) -> Result<()>
    where
        F: FnMut(ResultRecord) + Send,
    {
        let root = self.resolver.root_url().clone();
        let visited = VisitedSet::seeded(root.as_str());
        let on_record = Mutex::new(on_record);

        tracing::info!("Starting crawl '{}' at {}", self.name, root);
        let started = Instant::now();
        self.emit(&Event::Running {
            urls: std::slice::from_ref(&root),
        });

        let handler = |response: FetchResponse| self.handle_response(response, &visited, &on_record);
        self.transport.expand(&root, &handler).await?;

        tracing::info!(
            "Crawl '{}' completed: {} location(s) visited in {:?}",
            self.name,
            visited.len(),
            started.elapsed()
        );
        Ok(())
    }

    /// Response handler driven by the transport during [`Crawler::build_pages`]
    fn handle_response<F>(
        &self,
        response: FetchResponse,
        visited: &VisitedSet,
        on_record: &Mutex<F>,
    ) -> Result<Vec<Url>>
    where
        F: FnMut(ResultRecord),
    {
        if !self.transport.is_processable(&response) {
            self.emit(&Event::IgnoreResponse { url: &response.url });
            return Ok(Vec::new());
        }

        let record = match self.process_response(&response) {
            Ok(record) => record,
            Err(ScrapeError::Filter(e)) => {
                tracing::warn!("Skipping {}: {}", response.url, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let queued = record
            .internal_urls()
            .map(|urls| self.admit(urls, visited));

        {
            let mut on_record = on_record.lock().unwrap_or_else(PoisonError::into_inner);
            (*on_record)(record);
        }

        match queued {
            Some(urls) => {
                self.emit(&Event::Queued { urls: &urls });
                Ok(urls)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Parses a response and runs it through the pipeline
    ///
    /// `process_response` is emitted whether or not the pipeline succeeds; on failure
    /// the event carries whatever the filters wrote before the error.
    fn process_response(&self, response: &FetchResponse) -> Result<ResultRecord> {
        let started = Instant::now();
        let mut record = ResultRecord::new();
        let outcome = self.run_pipeline(response, &mut record);

        self.emit(&Event::ProcessResponse {
            url: &response.url,
            record: &record,
            elapsed: started.elapsed(),
        });
        outcome.map(|()| record)
    }

    fn run_pipeline(&self, response: &FetchResponse, record: &mut ResultRecord) -> Result<()> {
        let document = self.parser.parse(&response.body)?;
        let context = FilterContext::new(Arc::clone(&self.options), response.url.clone());
        self.pipeline.run(document, &context, record)?;
        Ok(())
    }

    /// Keeps, in order, the locations that parse and have not been visited yet
    fn admit(&self, urls: &[String], visited: &VisitedSet) -> Vec<Url> {
        let mut admitted = Vec::new();

        for location in urls {
            match Url::parse(location) {
                Ok(url) => {
                    if visited.insert(url.as_str()) {
                        admitted.push(url);
                    }
                }
                Err(e) => {
                    tracing::debug!("Ignoring malformed location '{}': {}", location, e);
                }
            }
        }

        admitted
    }

    fn emit(&self, event: &Event<'_>) {
        let emitted = panic::catch_unwind(AssertUnwindSafe(|| self.instrumentation.emit(event)));
        if emitted.is_err() {
            tracing::warn!("Instrumentation panicked on '{}' event", event.name());
        }
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Crawler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("name", &self.name)
            .field("transport", &self.transport)
            .field("resolver", &self.resolver)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

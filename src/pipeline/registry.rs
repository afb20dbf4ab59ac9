use crate::pipeline::filters::{Attribution, CleanHtml, CleanText, Container, InnerHtml, InternalUrls};
use crate::pipeline::Filter;
use std::collections::HashMap;
use std::sync::Arc;

/// Filters available to pipelines, by name
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in filter
    pub fn with_defaults() -> Self {
        Self::new()
            .with(Container)
            .with(CleanHtml)
            .with(InternalUrls)
            .with(InnerHtml)
            .with(CleanText)
            .with(Attribution)
    }

    /// Registers a filter under its own name, replacing any filter with that name
    pub fn register(&mut self, filter: impl Filter + 'static) {
        self.filters
            .insert(filter.name().to_string(), Arc::new(filter));
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.register(filter);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Filter>> {
        self.filters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterRegistry").field("filters", &names).finish()
    }
}

//! Structural filters: they reshape the markup and collect links

use crate::pipeline::{Document, Filter, FilterContext, ResultRecord};
use crate::url::resolve_link;
use crate::FilterError;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Elements dropped by [`CleanHtml`]
const NOISE_SELECTOR: &str = "script, style, noscript, iframe";

fn expect_html<'a>(filter: &str, document: &'a Document) -> Result<&'a str, FilterError> {
    document.as_html().ok_or_else(|| FilterError::ExpectedHtml {
        filter: filter.to_string(),
    })
}

fn parse_selector(filter: &str, selector: &str) -> Result<Selector, FilterError> {
    Selector::parse(selector).map_err(|_| FilterError::InvalidSelector {
        filter: filter.to_string(),
        selector: selector.to_string(),
    })
}

/// Narrows the document to the element named by the `container` option
///
/// Without a `container` option the document passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Container;

impl Filter for Container {
    fn name(&self) -> &str {
        "container"
    }

    fn call(
        &self,
        document: Document,
        context: &FilterContext,
        _record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        let Some(container) = context.options().container() else {
            return Ok(document);
        };

        let html = Html::parse_document(expect_html(self.name(), &document)?);
        let selector = parse_selector(self.name(), container)?;

        let element = html
            .select(&selector)
            .next()
            .ok_or_else(|| FilterError::MissingElement {
                filter: self.name().to_string(),
                selector: container.to_string(),
                url: context.url().to_string(),
            })?;

        Ok(Document::Html(element.inner_html()))
    }
}

/// Removes scripts, styles, embedded frames and comments
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanHtml;

impl Filter for CleanHtml {
    fn name(&self) -> &str {
        "clean_html"
    }

    fn call(
        &self,
        document: Document,
        _context: &FilterContext,
        _record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        let mut html = Html::parse_document(expect_html(self.name(), &document)?);
        let selector = parse_selector(self.name(), NOISE_SELECTOR)?;

        let mut doomed: Vec<_> = html.select(&selector).map(|element| element.id()).collect();
        doomed.extend(
            html.tree
                .nodes()
                .filter(|node| node.value().is_comment())
                .map(|node| node.id()),
        );

        for id in doomed {
            if let Some(mut node) = html.tree.get_mut(id) {
                node.detach();
            }
        }

        Ok(Document::Html(html.html()))
    }
}

/// Records the internal locations a page links to
///
/// Links are resolved against the page location, stripped of fragments, kept only when
/// they fall under the base location and pass the skip/only rules, and de-duplicated
/// in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalUrls;

impl Filter for InternalUrls {
    fn name(&self) -> &str {
        "internal_urls"
    }

    fn call(
        &self,
        document: Document,
        context: &FilterContext,
        record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        let html = Html::parse_document(expect_html(self.name(), &document)?);
        let options = context.options();

        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in html.select(&a_selector) {
                // Skip if it has the download attribute
                if element.value().attr("download").is_some() {
                    continue;
                }

                let Some(url) = element
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_link(href, context.url()))
                else {
                    continue;
                };

                let Some(subpath) = options.subpath_to(&url) else {
                    continue;
                };

                if !options.rules().allows(&subpath) {
                    tracing::trace!("Skipping {} (subpath '{}')", url, subpath);
                    continue;
                }

                if seen.insert(url.as_str().to_string()) {
                    urls.push(url.to_string());
                }
            }
        }

        record.set_internal_urls(urls);
        Ok(document)
    }
}

//! Text filters: they turn the cleaned markup into record content

use crate::pipeline::{Document, Filter, FilterContext, ResultRecord};
use crate::FilterError;
use scraper::{Html, Selector};

/// Returns the body of a parsed document, falling back to the root element
fn body_of(html: &Html) -> scraper::ElementRef<'_> {
    if let Ok(selector) = Selector::parse("body") {
        if let Some(body) = html.select(&selector).next() {
            return body;
        }
    }
    html.root_element()
}

/// Writes the markup of the page body into the `html` key
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerHtml;

impl Filter for InnerHtml {
    fn name(&self) -> &str {
        "inner_html"
    }

    fn call(
        &self,
        document: Document,
        _context: &FilterContext,
        record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        if let Document::Html(source) = &document {
            let html = Html::parse_document(source);
            record.insert_text("html", body_of(&html).inner_html().trim());
        }
        Ok(document)
    }
}

/// Extracts whitespace-collapsed text into the `text` key
///
/// The document becomes [`Document::Text`] for the filters that follow.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanText;

impl Filter for CleanText {
    fn name(&self) -> &str {
        "clean_text"
    }

    fn call(
        &self,
        document: Document,
        _context: &FilterContext,
        record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        let raw = match &document {
            Document::Html(source) => {
                let html = Html::parse_document(source);
                body_of(&html).text().collect::<Vec<_>>().join(" ")
            }
            Document::Text(text) => text.clone(),
        };

        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        record.insert_text("text", text.clone());
        Ok(Document::Text(text))
    }
}

/// Copies the `attribution` option into the record
#[derive(Debug, Clone, Copy, Default)]
pub struct Attribution;

impl Filter for Attribution {
    fn name(&self) -> &str {
        "attribution"
    }

    fn call(
        &self,
        document: Document,
        context: &FilterContext,
        record: &mut ResultRecord,
    ) -> Result<Document, FilterError> {
        if let Some(attribution) = context.options().attribution() {
            record.insert_text("attribution", attribution);
        }
        Ok(document)
    }
}

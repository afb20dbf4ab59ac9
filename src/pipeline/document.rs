//! Documents flowing through the pipeline and the parser that produces them

use crate::ParseError;
use scraper::Html;

/// The document handed from filter to filter
///
/// Structural filters work on [`Document::Html`]; text filters may turn it into
/// [`Document::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// Serialized HTML markup
    Html(String),

    /// Extracted plain text
    Text(String),
}

impl Document {
    /// Returns the markup if this is an HTML document
    pub fn as_html(&self) -> Option<&str> {
        match self {
            Document::Html(html) => Some(html),
            Document::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Document::Html(s) | Document::Text(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Document::Html(s) | Document::Text(s) => s,
        }
    }
}

/// Turns a raw response body into a document
pub trait Parser: Send + Sync {
    fn parse(&self, body: &[u8]) -> Result<Document, ParseError>;
}

/// Parses bodies as HTML with `scraper`
///
/// The body must be UTF-8. Markup is re-serialized after parsing, so every later
/// filter sees a well-formed document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl Parser for HtmlParser {
    fn parse(&self, body: &[u8]) -> Result<Document, ParseError> {
        let source = std::str::from_utf8(body)?;
        let html = Html::parse_document(source);
        Ok(Document::Html(html.html()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_html() {
        let document = HtmlParser
            .parse(b"<html><head><title>Intro</title></head><body><p>Hi</body></html>")
            .unwrap();

        let html = document.as_html().unwrap();
        assert!(html.contains("<title>Intro</title>"));
        assert!(html.contains("<p>Hi</p>"));
    }

    #[test]
    fn test_parse_fragment_gets_wrapped() {
        let document = HtmlParser.parse(b"<p>loose</p>").unwrap();
        let html = document.as_html().unwrap();
        assert!(html.starts_with("<html>"));
        assert!(html.contains("<body><p>loose</p></body>"));
    }

    #[test]
    fn test_invalid_utf8() {
        let result = HtmlParser.parse(&[0x3c, 0x70, 0xff, 0xfe]);
        assert!(matches!(result, Err(ParseError::Encoding(_))));
    }

    #[test]
    fn test_document_accessors() {
        let text = Document::Text("plain".to_string());
        assert_eq!(text.as_html(), None);
        assert_eq!(text.as_str(), "plain");
        assert_eq!(text.into_string(), "plain");
    }
}

//! Built-in filters
//!
//! Structural filters (`container`, `clean_html`, `internal_urls`) run first, on the
//! markup; text filters (`inner_html`, `clean_text`, `attribution`) run after them and
//! produce the record content.

mod html;
mod text;

pub use html::{CleanHtml, Container, InternalUrls};
pub use text::{Attribution, CleanText, InnerHtml};

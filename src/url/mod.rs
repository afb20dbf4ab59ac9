//! URL handling module for docscrape
//!
//! This module provides location normalization, link resolution, base/root location
//! resolution and the skip/only path rules that decide which links are followed.

mod matcher;
mod normalize;
mod resolver;

// Re-export main types and functions
pub use matcher::PathRules;
pub use normalize::{join_path, normalize_location, resolve_link};
pub use resolver::{subpath_to, LocationResolver};

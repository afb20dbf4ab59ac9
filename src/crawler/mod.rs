//! Crawler module: the crawl frontier
//!
//! This module contains the core crawling logic, including:
//! - Resolving where a crawl starts
//! - De-duplicating discovered locations
//! - Classifying and processing responses
//! - Reporting progress to instrumentation

mod coordinator;
mod visited;

pub use coordinator::Crawler;
pub use visited::VisitedSet;

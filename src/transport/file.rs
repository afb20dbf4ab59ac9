//! Filesystem transport
//!
//! Serves a local directory as if it were mounted at the crawl's base location, so a
//! downloaded copy of a documentation site can be scraped without network access.

use crate::transport::{FetchResponse, ResponseHandler, Transport};
use crate::url::{normalize_location, subpath_to};
use crate::{FetchError, LocationError, ScrapeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use url::Url;

/// File served for a location that names a directory
const INDEX_FILE: &str = "index.html";

/// Reads pages from a directory tree
#[derive(Debug, Clone)]
pub struct FileTransport {
    dir: PathBuf,
    base_url: Url,
}

impl FileTransport {
    /// Creates a transport serving `dir` at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use docscrape::FileTransport;
    ///
    /// let transport = FileTransport::new("/srv/docs", "http://example.com/").unwrap();
    /// let url = url::Url::parse("http://example.com/guide/intro.html").unwrap();
    /// assert_eq!(
    ///     transport.path_for(&url).unwrap(),
    ///     std::path::Path::new("/srv/docs/guide/intro.html")
    /// );
    /// ```
    pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> Result<Self, LocationError> {
        Ok(Self {
            dir: dir.into(),
            base_url: normalize_location(base_url)?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a location to the file that backs it
    ///
    /// `base_url/<path>` maps to `<dir>/<path>`. An empty path, or one ending in `/`,
    /// maps to the `index.html` inside that directory.
    pub fn path_for(&self, url: &Url) -> Result<PathBuf, FetchError> {
        let subpath =
            subpath_to(&self.base_url, url).ok_or_else(|| FetchError::OutOfScope(url.to_string()))?;

        let mut path = self.dir.clone();
        path.extend(subpath.split('/').filter(|segment| !segment.is_empty()));

        if subpath.is_empty() || subpath.ends_with('/') {
            path.push(INDEX_FILE);
        }

        Ok(path)
    }

    /// Reads a file, treating a missing or unreadable file as an empty body
    async fn read_file(&self, path: &Path) -> Vec<u8> {
        match tokio::fs::read(path).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Could not read {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch_one(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let path = self.path_for(url)?;
        tracing::trace!("Reading {} for {}", path.display(), url);

        let body = self.read_file(&path).await;
        Ok(FetchResponse::new(url.clone(), body))
    }

    async fn expand(&self, seed: &Url, handler: &ResponseHandler<'_>) -> Result<(), ScrapeError> {
        let mut queue = VecDeque::from([seed.clone()]);

        while let Some(url) = queue.pop_front() {
            let response = match self.fetch_one(&url).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    continue;
                }
            };

            queue.extend(handler(response)?);
        }

        Ok(())
    }
}

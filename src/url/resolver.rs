//! Location resolution for a crawl
//!
//! Turns a configured base location and optional root sub-path into the absolute
//! root location of the crawl, and builds absolute locations for individual paths.

use crate::url::normalize::{join_path, normalize_location};
use crate::LocationError;
use url::Url;

/// Resolves the base, root and per-path locations of one crawler
///
/// All locations are computed once at construction; accessors never re-parse.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    base_url: Url,
    root_path: Option<String>,
    root_url: Url,
}

impl LocationResolver {
    /// Creates a resolver from a base location and an optional root sub-path
    ///
    /// # Arguments
    ///
    /// * `base` - The base location of the documentation site
    /// * `root_path` - Sub-path of the base location where the crawl starts
    ///
    /// # Returns
    ///
    /// * `Ok(LocationResolver)` - Both locations resolved
    /// * `Err(LocationError)` - The base (or joined root) location is not an absolute location
    ///
    /// # Example
    ///
    /// ```
    /// use docscrape::url::LocationResolver;
    ///
    /// let resolver = LocationResolver::new("http://x/", Some("/docs")).unwrap();
    /// assert_eq!(resolver.root_url().as_str(), "http://x/docs");
    /// assert_eq!(resolver.url_for("").unwrap().as_str(), "http://x/docs");
    /// assert_eq!(resolver.url_for("other").unwrap().as_str(), "http://x/other");
    /// ```
    pub fn new(base: &str, root_path: Option<&str>) -> Result<Self, LocationError> {
        let base_url = normalize_location(base)?;
        let root_path = root_path
            .map(str::trim)
            .filter(|path| !path.is_empty() && *path != "/")
            .map(str::to_string);

        let root_url = match &root_path {
            Some(path) => normalize_location(&join_path(base_url.as_str(), path))?,
            None => base_url.clone(),
        };

        Ok(Self {
            base_url,
            root_path,
            root_url,
        })
    }

    /// The normalized base location
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The root sub-path, if it is neither empty nor `/`
    pub fn root_path(&self) -> Option<&str> {
        self.root_path.as_deref()
    }

    /// Returns true if a non-trivial root sub-path is configured
    pub fn has_root_path(&self) -> bool {
        self.root_path.is_some()
    }

    /// The location where the crawl starts
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Builds the absolute location for a path
    ///
    /// An empty path or `/` always resolves to the root location. Every other path is
    /// joined onto the base location, not the root location.
    pub fn url_for(&self, path: &str) -> Result<Url, LocationError> {
        if path.is_empty() || path == "/" {
            return Ok(self.root_url.clone());
        }

        normalize_location(&join_path(self.base_url.as_str(), path))
    }

    /// Returns the path of `url` relative to the base location
    ///
    /// `None` means the location is not internal: a different scheme, host or port, or
    /// a path outside the base path. The base location itself yields `""` or `"/"`
    /// depending on its trailing slash.
    pub fn subpath_to(&self, url: &Url) -> Option<String> {
        subpath_to(&self.base_url, url)
    }
}

/// Returns the path of `url` relative to `base`, or `None` if `url` is outside it
pub fn subpath_to(base: &Url, url: &Url) -> Option<String> {
    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return None;
    }

    let base_path = base.path().trim_end_matches('/');
    let rest = url.path().strip_prefix(base_path)?;

    if rest.is_empty() || rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

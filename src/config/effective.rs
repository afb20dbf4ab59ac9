//! Per-crawl effective options
//!
//! The options a crawl actually runs with: the crawler type's option map merged with
//! the resolved locations and the root-path scoping rules. They are composed once and
//! shared read-only for the rest of the crawl.

use crate::config::types::CrawlConfig;
use crate::url::{subpath_to, LocationResolver, PathRules};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use std::sync::Arc;
use url::Url;

/// Frozen options of one crawl
///
/// Only shared references are ever handed out, so the value cannot change once
/// composed:
///
/// ```compile_fail
/// use docscrape::{CrawlConfig, EffectiveOptions, LocationResolver};
///
/// let config = CrawlConfig::builder("docs", "http://x/").build();
/// let resolver = LocationResolver::new(config.base_url(), config.root_path()).unwrap();
/// let options = EffectiveOptions::compose(&config, &resolver).unwrap();
/// options.skip().push("/other".to_string());
/// ```
#[derive(Debug)]
pub struct EffectiveOptions {
    base_url: Url,
    root_path: Option<String>,
    root_url: Url,
    rules: PathRules,
    container: Option<String>,
    attribution: Option<String>,
    extra: toml::Table,
}

impl EffectiveOptions {
    /// Composes the effective options of a crawl
    ///
    /// # Composition Steps
    ///
    /// 1. Copy the crawler type's options
    /// 2. Record the resolved base location, root path and root location
    /// 3. With a root path, skip the bare base location (`""` and `"/"`): under a
    ///    sub-path configuration it is the same page as the root
    /// 4. When `only` or `only_patterns` is configured, add the root to `only`
    ///    (the root location's subpath if a root path is set, else `""` and `"/"`)
    /// 5. Compile skip/only patterns
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<EffectiveOptions>)` - The frozen options
    /// * `Err(ConfigError)` - A skip or only pattern is not a valid regular expression
    pub fn compose(
        config: &CrawlConfig,
        resolver: &LocationResolver,
    ) -> ConfigResult<Arc<EffectiveOptions>> {
        let options = config.options().clone();

        let mut skip = options.skip.unwrap_or_default();
        if resolver.has_root_path() {
            skip.extend(["".to_string(), "/".to_string()]);
        }

        let mut only = options.only;
        if only.is_some() || options.only_patterns.is_some() {
            // Compared against subpaths, so the root path needs the same leading slash
            let root_entries = match resolver.root_path() {
                Some(path) => vec![resolver
                    .subpath_to(resolver.root_url())
                    .unwrap_or_else(|| path.to_string())],
                None => vec!["".to_string(), "/".to_string()],
            };
            only.get_or_insert_with(Vec::new).extend(root_entries);
        }

        let rules = PathRules {
            skip,
            skip_patterns: compile_patterns(options.skip_patterns.as_deref())?,
            only,
            only_patterns: compile_patterns(options.only_patterns.as_deref())?,
        };

        Ok(Arc::new(EffectiveOptions {
            base_url: resolver.base_url().clone(),
            root_path: resolver.root_path().map(str::to_string),
            root_url: resolver.root_url().clone(),
            rules,
            container: options.container,
            attribution: options.attribution,
            extra: options.extra,
        }))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn root_path(&self) -> Option<&str> {
        self.root_path.as_deref()
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Path of `url` relative to the base location, `None` if it is not internal
    pub fn subpath_to(&self, url: &Url) -> Option<String> {
        subpath_to(&self.base_url, url)
    }

    /// Skip and only rules applied to discovered links
    pub fn rules(&self) -> &PathRules {
        &self.rules
    }

    pub fn skip(&self) -> &[String] {
        &self.rules.skip
    }

    pub fn only(&self) -> Option<&[String]> {
        self.rules.only.as_deref()
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }

    /// Looks up an option that has no dedicated accessor
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.extra.get(key)
    }
}

/// Compiles path patterns, reporting the first invalid one
pub(crate) fn compile_patterns(patterns: Option<&[String]>) -> ConfigResult<Vec<Regex>> {
    patterns
        .unwrap_or_default()
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(config: &CrawlConfig) -> Arc<EffectiveOptions> {
        let resolver = LocationResolver::new(config.base_url(), config.root_path()).unwrap();
        EffectiveOptions::compose(config, &resolver).unwrap()
    }

    #[test]
    fn test_computed_locations() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .root_path("/docs")
            .build();
        let options = compose(&config);

        assert_eq!(options.base_url().as_str(), "http://x/");
        assert_eq!(options.root_path(), Some("/docs"));
        assert_eq!(options.root_url().as_str(), "http://x/docs");
    }

    #[test]
    fn test_root_path_skips_bare_base() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .root_path("/docs")
            .options(|o| o.skip = Some(vec!["/print".to_string()]))
            .build();
        let options = compose(&config);

        assert_eq!(options.skip(), ["/print", "", "/"]);
        assert!(!options.rules().allows(""));
        assert!(!options.rules().allows("/"));
        assert!(options.rules().allows("/docs"));
    }

    #[test]
    fn test_no_root_path_leaves_skip_alone() {
        let config = CrawlConfig::builder("docs", "http://x/").build();
        let options = compose(&config);

        assert!(options.skip().is_empty());
        assert_eq!(options.only(), None);
    }

    #[test]
    fn test_only_gets_root_path() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .root_path("/docs")
            .options(|o| o.only = Some(vec!["/docs/intro".to_string()]))
            .build();
        let options = compose(&config);

        assert_eq!(options.only(), Some(&["/docs/intro".to_string(), "/docs".to_string()][..]));
    }

    #[test]
    fn test_relative_root_path_matches_its_subpath() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .root_path("guide/index.html")
            .options(|o| o.only_patterns = Some(vec!["^/api/".to_string()]))
            .build();
        let options = compose(&config);

        assert_eq!(options.only(), Some(&["/guide/index.html".to_string()][..]));
        assert!(options.rules().allows("/guide/index.html"));
        assert!(options.rules().allows("/api/types"));
        assert!(!options.rules().allows("/blog"));
    }

    #[test]
    fn test_only_patterns_create_only_list() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .options(|o| o.only_patterns = Some(vec!["^/guide/".to_string()]))
            .build();
        let options = compose(&config);

        assert_eq!(options.only(), Some(&["".to_string(), "/".to_string()][..]));
        assert!(options.rules().allows("/"));
        assert!(options.rules().allows("/guide/intro"));
        assert!(!options.rules().allows("/blog"));
    }

    #[test]
    fn test_type_level_options_untouched() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .root_path("/docs")
            .options(|o| o.skip = Some(vec!["/print".to_string()]))
            .build();
        let _ = compose(&config);

        assert_eq!(config.options().skip, Some(vec!["/print".to_string()]));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .options(|o| o.skip_patterns = Some(vec!["(unclosed".to_string()]))
            .build();
        let resolver = LocationResolver::new(config.base_url(), None).unwrap();
        let result = EffectiveOptions::compose(&config, &resolver);

        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_shared_options_cannot_be_borrowed_mutably() {
        let config = CrawlConfig::builder("docs", "http://x/").build();
        let mut options = compose(&config);
        let shared = Arc::clone(&options);

        assert!(Arc::get_mut(&mut options).is_none());
        assert_eq!(shared.base_url(), options.base_url());
    }

    #[test]
    fn test_extra_options() {
        let config = CrawlConfig::builder("docs", "http://x/")
            .options(|o| {
                o.extra
                    .insert("version".to_string(), toml::Value::String("2.0".to_string()));
            })
            .build();
        let options = compose(&config);

        assert_eq!(options.get("version").and_then(|v| v.as_str()), Some("2.0"));
        assert!(options.get("missing").is_none());
    }
}

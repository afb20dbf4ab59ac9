use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for docscrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: CrawlConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Static description of one kind of documentation crawler
///
/// A `CrawlConfig` is a value: it is never mutated after construction. Variants are
/// made with [`CrawlConfig::derive`], which starts a builder from an independent copy,
/// so changes to the derived configuration never leak back into its parent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    name: String,
    base_url: String,
    #[serde(default)]
    root_path: Option<String>,
    #[serde(default)]
    filters: FilterConfig,
    #[serde(default)]
    options: CrawlOptions,
}

impl CrawlConfig {
    /// Starts a configuration with the default filter stacks and no options
    ///
    /// # Example
    ///
    /// ```
    /// use docscrape::CrawlConfig;
    ///
    /// let base = CrawlConfig::builder("docs", "https://example.com/").build();
    /// let guide = base.derive().name("guide").root_path("/guide").build();
    ///
    /// assert_eq!(base.root_path(), None);
    /// assert_eq!(guide.root_path(), Some("/guide"));
    /// ```
    pub fn builder(name: impl Into<String>, base_url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            config: CrawlConfig {
                name: name.into(),
                base_url: base_url.into(),
                root_path: None,
                filters: FilterConfig::default(),
                options: CrawlOptions::default(),
            },
        }
    }

    /// Starts a builder from an independent copy of this configuration
    pub fn derive(&self) -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            config: self.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn root_path(&self) -> Option<&str> {
        self.root_path.as_deref()
    }

    /// Structural filters, in execution order
    pub fn html_filters(&self) -> &FilterStack {
        &self.filters.html
    }

    /// Text filters, in execution order (run after every structural filter)
    pub fn text_filters(&self) -> &FilterStack {
        &self.filters.text
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }
}

/// Builder for [`CrawlConfig`]
#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl CrawlConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn root_path(mut self, root_path: impl Into<String>) -> Self {
        self.config.root_path = Some(root_path.into());
        self
    }

    /// Edits the structural filter stack
    pub fn html_filters(mut self, edit: impl FnOnce(&mut FilterStack)) -> Self {
        edit(&mut self.config.filters.html);
        self
    }

    /// Edits the text filter stack
    pub fn text_filters(mut self, edit: impl FnOnce(&mut FilterStack)) -> Self {
        edit(&mut self.config.filters.text);
        self
    }

    /// Edits the option map
    pub fn options(mut self, edit: impl FnOnce(&mut CrawlOptions)) -> Self {
        edit(&mut self.config.options);
        self
    }

    pub fn build(self) -> CrawlConfig {
        self.config
    }
}

/// The two ordered filter stacks of a crawler
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "FilterStack::default_html")]
    pub html: FilterStack,
    #[serde(default = "FilterStack::default_text")]
    pub text: FilterStack,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            html: FilterStack::default_html(),
            text: FilterStack::default_text(),
        }
    }
}

/// An ordered list of filter names
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FilterStack(Vec<String>);

impl FilterStack {
    /// Default structural stack
    pub fn default_html() -> Self {
        Self::from_names(["container", "clean_html", "internal_urls"])
    }

    /// Default text stack
    pub fn default_text() -> Self {
        Self::from_names(["inner_html", "clean_text", "attribution"])
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// Inserts `name` right before `existing`; appends if `existing` is absent
    pub fn insert_before(&mut self, existing: &str, name: impl Into<String>) {
        let index = self.position(existing).unwrap_or(self.0.len());
        self.0.insert(index, name.into());
    }

    /// Inserts `name` right after `existing`; appends if `existing` is absent
    pub fn insert_after(&mut self, existing: &str, name: impl Into<String>) {
        let index = self.position(existing).map_or(self.0.len(), |i| i + 1);
        self.0.insert(index, name.into());
    }

    /// Replaces `existing` with `name`, returning false if `existing` is absent
    pub fn replace(&mut self, existing: &str, name: impl Into<String>) -> bool {
        match self.position(existing) {
            Some(index) => {
                self.0[index] = name.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }
}

/// Type-level crawl options
///
/// Paths in `skip` and `only` are compared against the subpath of a link relative to
/// the base location; patterns are regular expressions searched in that subpath.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlOptions {
    /// CSS selector of the element holding the page content
    #[serde(default)]
    pub container: Option<String>,

    /// Attribution text attached to every record
    #[serde(default)]
    pub attribution: Option<String>,

    #[serde(default)]
    pub skip: Option<Vec<String>>,

    #[serde(default)]
    pub skip_patterns: Option<Vec<String>>,

    #[serde(default)]
    pub only: Option<Vec<String>>,

    #[serde(default)]
    pub only_patterns: Option<Vec<String>>,

    /// Any other option, available to custom filters
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Which transport fetches pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    File,
}

/// Transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,

    /// Directory served by the file transport
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Maximum number of requests in flight (HTTP only)
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Request timeout in seconds (HTTP only)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            dir: None,
            max_concurrent_requests: default_max_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_concurrent_requests() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_crawler_name() -> String {
    "docscrape".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_stacks() {
        let config = CrawlConfig::builder("docs", "https://example.com/").build();
        assert_eq!(
            config.html_filters().names(),
            ["container", "clean_html", "internal_urls"]
        );
        assert_eq!(
            config.text_filters().names(),
            ["inner_html", "clean_text", "attribution"]
        );
    }

    #[test]
    fn test_derive_does_not_leak_into_parent() {
        let parent = CrawlConfig::builder("docs", "https://example.com/")
            .options(|o| o.skip = Some(vec!["/private".to_string()]))
            .build();

        let child = parent
            .derive()
            .html_filters(|stack| stack.push("custom"))
            .options(|o| {
                o.skip.get_or_insert_with(Vec::new).push("/drafts".to_string());
                o.container = Some("main".to_string());
            })
            .build();

        assert_eq!(parent.html_filters().names().len(), 3);
        assert_eq!(child.html_filters().names().len(), 4);
        assert_eq!(parent.options().skip, Some(vec!["/private".to_string()]));
        assert_eq!(
            child.options().skip,
            Some(vec!["/private".to_string(), "/drafts".to_string()])
        );
        assert!(parent.options().container.is_none());
    }

    #[test]
    fn test_filter_stack_editing() {
        let mut stack = FilterStack::default_html();
        stack.insert_before("internal_urls", "normalize_urls");
        stack.insert_after("container", "title");
        assert!(stack.replace("clean_html", "strip_html"));
        assert!(!stack.replace("missing", "other"));
        assert!(stack.remove("title"));

        assert_eq!(
            stack.names(),
            ["container", "strip_html", "normalize_urls", "internal_urls"]
        );
    }

    #[test]
    fn test_insert_relative_to_missing_appends() {
        let mut stack = FilterStack::from_names(["a"]);
        stack.insert_before("missing", "b");
        stack.insert_after("missing", "c");
        assert_eq!(stack.names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_user_agent_header() {
        let mut agent = UserAgentConfig::default();
        assert!(agent.header_value().starts_with("docscrape/"));

        agent.contact_url = Some("https://example.com/bot".to_string());
        assert!(agent.header_value().ends_with("(+https://example.com/bot)"));
    }

    #[test]
    fn test_options_collect_unknown_keys() {
        let options: CrawlOptions = toml::from_str(
            r#"
container = "main"
only-patterns = ["^/guide"]
fix-links = true
"#,
        )
        .unwrap();

        assert_eq!(options.container.as_deref(), Some("main"));
        assert_eq!(options.only_patterns, Some(vec!["^/guide".to_string()]));
        assert_eq!(options.extra.get("fix-links"), Some(&toml::Value::Boolean(true)));
    }
}

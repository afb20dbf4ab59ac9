use regex::Regex;

/// Inclusion and exclusion rules applied to subpaths of the base location
///
/// Exact entries are compared against the whole subpath; patterns are regular
/// expressions searched anywhere in it.
#[derive(Debug, Clone, Default)]
pub struct PathRules {
    /// Subpaths that are never followed
    pub skip: Vec<String>,

    /// Patterns for subpaths that are never followed
    pub skip_patterns: Vec<Regex>,

    /// When set, only these subpaths (or `only_patterns` matches) are followed
    pub only: Option<Vec<String>>,

    /// Patterns for subpaths that are followed when an inclusion list is active
    pub only_patterns: Vec<Regex>,
}

impl PathRules {
    /// Returns true if an inclusion list (`only` or `only_patterns`) is active
    pub fn has_inclusions(&self) -> bool {
        self.only.is_some() || !self.only_patterns.is_empty()
    }

    /// Checks whether a subpath passes the rules
    ///
    /// # Examples
    ///
    /// ```
    /// use docscrape::url::PathRules;
    ///
    /// let rules = PathRules {
    ///     skip: vec!["/".to_string()],
    ///     ..PathRules::default()
    /// };
    /// assert!(!rules.allows("/"));
    /// assert!(rules.allows("/guide"));
    /// ```
    pub fn allows(&self, subpath: &str) -> bool {
        if self.is_skipped(subpath) {
            return false;
        }

        if !self.has_inclusions() {
            return true;
        }

        self.only
            .as_ref()
            .is_some_and(|only| only.iter().any(|entry| entry == subpath))
            || self.only_patterns.iter().any(|re| re.is_match(subpath))
    }

    fn is_skipped(&self, subpath: &str) -> bool {
        self.skip.iter().any(|entry| entry == subpath)
            || self.skip_patterns.iter().any(|re| re.is_match(subpath))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_no_rules_allows_everything() {
        let rules = PathRules::default();
        assert!(rules.allows(""));
        assert!(rules.allows("/anything"));
    }

    #[test]
    fn test_exact_skip() {
        let rules = PathRules {
            skip: vec!["".to_string(), "/".to_string()],
            ..PathRules::default()
        };
        assert!(!rules.allows(""));
        assert!(!rules.allows("/"));
        assert!(rules.allows("/docs"));
    }

    #[test]
    fn test_skip_pattern() {
        let rules = PathRules {
            skip_patterns: vec![re(r"\.pdf$")],
            ..PathRules::default()
        };
        assert!(!rules.allows("/manual.pdf"));
        assert!(rules.allows("/manual.html"));
    }

    #[test]
    fn test_only_list() {
        let rules = PathRules {
            only: Some(vec!["/docs".to_string()]),
            ..PathRules::default()
        };
        assert!(rules.allows("/docs"));
        assert!(!rules.allows("/docs/other"));
    }

    #[test]
    fn test_only_patterns() {
        let rules = PathRules {
            only: Some(vec!["/docs".to_string()]),
            only_patterns: vec![re(r"^/docs/")],
            ..PathRules::default()
        };
        assert!(rules.allows("/docs"));
        assert!(rules.allows("/docs/intro"));
        assert!(!rules.allows("/blog/post"));
    }

    #[test]
    fn test_skip_wins_over_only() {
        let rules = PathRules {
            skip: vec!["/docs/private".to_string()],
            only_patterns: vec![re(r"^/docs")],
            ..PathRules::default()
        };
        assert!(!rules.allows("/docs/private"));
        assert!(rules.allows("/docs/public"));
    }
}

use regex::Regex;

/// A URL rule that failed to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPattern {
    /// The pattern source as written in the seed configuration
    pub pattern: String,

    /// The regex compiler's explanation
    pub reason: String,
}

/// Ordered list of compiled URL rules
///
/// Matching uses search semantics: a rule matches when it finds a match
/// anywhere in the URL string, not only when it spans the whole URL.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compiles a list of regular expressions, dropping the ones that fail
    ///
    /// Each rejected pattern is logged at `warn` level. Use
    /// [`PatternSet::compile_reporting`] to inspect the rejections directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use seed_harvest::url::PatternSet;
    ///
    /// let set = PatternSet::compile(&["/news/", "(unclosed"]);
    /// assert_eq!(set.len(), 1);
    /// assert!(set.matches_any("https://example.com/news/today"));
    /// ```
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let (set, rejected) = Self::compile_reporting(patterns);
        for rejection in &rejected {
            tracing::warn!(
                "Dropping invalid URL pattern '{}': {}",
                rejection.pattern,
                rejection.reason
            );
        }
        set
    }

    /// Compiles a list of regular expressions and returns the rejected ones
    /// alongside the usable set
    pub fn compile_reporting<S: AsRef<str>>(patterns: &[S]) -> (Self, Vec<RejectedPattern>) {
        let mut compiled = Vec::with_capacity(patterns.len());
        let mut rejected = Vec::new();

        for pattern in patterns {
            let source = pattern.as_ref();
            match Regex::new(source) {
                Ok(regex) => compiled.push(regex),
                Err(e) => rejected.push(RejectedPattern {
                    pattern: source.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        (Self { patterns: compiled }, rejected)
    }

    /// Returns true if any rule finds a match anywhere in `url`
    ///
    /// An empty set never matches.
    pub fn matches_any(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(url))
    }

    /// Number of usable rules
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no rule survived compilation
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The rule sources in configuration order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_semantics() {
        let set = PatternSet::compile(&["/articles/"]);
        assert!(set.matches_any("https://example.com/articles/2024/post"));
        assert!(!set.matches_any("https://example.com/about"));
    }

    #[test]
    fn test_anchored_pattern() {
        let set = PatternSet::compile(&[r"^https://example\.com/"]);
        assert!(set.matches_any("https://example.com/page"));
        assert!(!set.matches_any("https://mirror.net/https://example.com/"));
    }

    #[test]
    fn test_any_of_several() {
        let set = PatternSet::compile(&["/news/", "/events/"]);
        assert!(set.matches_any("https://example.com/events/spring"));
        assert!(set.matches_any("https://example.com/news/"));
        assert!(!set.matches_any("https://example.com/shop/"));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let set = PatternSet::compile::<&str>(&[]);
        assert!(set.is_empty());
        assert!(!set.matches_any("https://example.com/"));
    }

    #[test]
    fn test_invalid_pattern_dropped() {
        let (set, rejected) = PatternSet::compile_reporting(&["(unclosed", r"\.pdf$", "[z-a]"]);
        assert_eq!(set.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].pattern, "(unclosed");
        assert_eq!(rejected[1].pattern, "[z-a]");
        assert!(set.matches_any("https://example.com/file.pdf"));
    }

    #[test]
    fn test_order_preserved() {
        let set = PatternSet::compile(&["b", "bad(", "a"]);
        let sources: Vec<&str> = set.sources().collect();
        assert_eq!(sources, vec!["b", "a"]);
    }
}
